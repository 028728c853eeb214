use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // codes below 100 are server-side failures, the rest are caller mistakes
        let status = match self.code {
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.message,
        }));

        (status, body).into_response()
    }
}

pub fn validation_error(message: impl Into<String>) -> Error {
    Error {
        code: 100,
        message: message.into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn config_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "invalid configuration value");
    Error {
        code: 1,
        message: "invalid configuration value".into(),
    }
}

pub fn connection_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "failed to acquire a store connection");
    Error {
        code: 2,
        message: "failed to acquire a store connection".into(),
    }
}

pub fn store_error<T: Debug>(err: T, message: impl Into<String>) -> Error {
    tracing::error!(?err, "route store operation failed");
    Error {
        code: 3,
        message: message.into(),
    }
}

pub fn recomputation_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "shortest path recomputation failed");
    Error {
        code: 4,
        message: "failed to refresh the shortest path".into(),
    }
}

pub fn timeout_error() -> Error {
    tracing::error!("route transaction exceeded its deadline");
    Error {
        code: 5,
        message: "route transaction timed out".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let response = validation_error("start point is missing").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_map_to_internal_server_error() {
        let response = store_error("boom", "failed to update route data").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = recomputation_error("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = timeout_error().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn taxonomy_codes_are_distinct() {
        let codes = [
            connection_error("e").code,
            store_error("e", "e").code,
            recomputation_error("e").code,
            timeout_error().code,
            validation_error("e").code,
        ];

        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}

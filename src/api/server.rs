use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::DynService,
    entities::EndpointInput,
    error::{validation_error, Error},
};

pub async fn serve(service: DynService, addr: SocketAddr) {
    tracing_subscriber::fmt::init();

    let app = router(service);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}

pub fn router(service: DynService) -> Router {
    Router::new()
        .route("/update-route", post(update_route))
        .route("/clear-shortest-path", post(clear_shortest_path))
        .layer(Extension(service))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRouteParams {
    #[serde(default)]
    start: Option<EndpointInput>,
    #[serde(default)]
    end: Option<EndpointInput>,
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub message: &'static str,
}

async fn update_route(
    Extension(service): Extension<DynService>,
    payload: Result<Json<UpdateRouteParams>, JsonRejection>,
) -> Result<Json<StatusBody>, Error> {
    // A missing or unparseable body is a caller mistake like any other
    // malformed endpoint, so it gets the same `{"error": ...}` shape
    // instead of axum's plain-text rejection.
    let Json(params) = payload.map_err(|err| validation_error(err.to_string()))?;

    service.set_route(params.start, params.end).await?;

    Ok(Json(StatusBody {
        status: "Success",
        message: "Route has been successfully updated",
    }))
}

async fn clear_shortest_path(
    Extension(service): Extension<DynService>,
) -> Result<Json<StatusBody>, Error> {
    service.clear_route().await?;

    Ok(Json(StatusBody {
        status: "Success",
        message: "Shortest path data cleared",
    }))
}

use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::EndpointInput;
use crate::error::Error;

pub mod server;

/// The public route-query contract: one globally shared current route,
/// replaced or cleared atomically together with its derived shortest path.
#[async_trait]
pub trait RouteService {
    async fn set_route(
        &self,
        start: Option<EndpointInput>,
        end: Option<EndpointInput>,
    ) -> Result<(), Error>;

    async fn clear_route(&self) -> Result<(), Error>;
}

pub type DynService = Arc<dyn RouteService + Send + Sync>;

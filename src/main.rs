use std::sync::Arc;

use wayfinder::api::{server::serve, DynService};
use wayfinder::config::Config;
use wayfinder::db::PgRouteStore;
use wayfinder::engine::Engine;

#[tokio::main]
async fn main() {
    let config = Config::from_env().unwrap();

    let store = PgRouteStore::new(&config.store).await.unwrap();

    let engine = Engine::new(store, config.unit_timeout);

    serve(Arc::new(engine) as DynService, config.bind_addr).await;
}

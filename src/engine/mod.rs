mod route_api;

use std::time::Duration;

/// The transaction coordinator. Owns the store and runs every public
/// operation as a single atomic unit: the endpoint set and the derived
/// shortest path change together or not at all.
pub struct Engine<S> {
    store: S,
    unit_timeout: Duration,
}

impl<S> Engine<S> {
    pub fn new(store: S, unit_timeout: Duration) -> Self {
        Self {
            store,
            unit_timeout,
        }
    }
}

mod point;

pub use point::{validate_endpoints, EndpointInput, EndpointRole, GeoPoint};

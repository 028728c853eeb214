use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{validation_error, Error};

const LON_KEYS: [&str; 3] = ["lon", "lng", "longitude"];
const LAT_KEYS: [&str; 2] = ["lat", "latitude"];

/// A canonical (longitude, latitude) pair. Immutable once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, Error> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(validation_error("coordinates must be finite numbers"));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(validation_error("longitude must be within [-180, 180]"));
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(validation_error("latitude must be within [-90, 90]"));
        }

        Ok(Self {
            longitude,
            latitude,
        })
    }
}

impl From<GeoPoint> for geo_types::Geometry<f64> {
    fn from(point: GeoPoint) -> Self {
        geo_types::Point::new(point.longitude, point.latitude).into()
    }
}

/// Position of a point within the endpoint set. The set holds either no
/// points at all or exactly one start followed by one end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointRole {
    Start,
    End,
}

impl EndpointRole {
    pub fn name(&self) -> &'static str {
        match self {
            EndpointRole::Start => "start",
            EndpointRole::End => "end",
        }
    }
}

/// An endpoint as submitted by a client: either an ordered `[lon, lat]`
/// pair or a keyed mapping such as `{"lon": .., "lat": ..}`. Both shapes
/// have been observed in the wild, so both are accepted and normalized to
/// the same [`GeoPoint`].
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum EndpointInput {
    Pair(Vec<Value>),
    Keyed(Map<String, Value>),
}

impl EndpointInput {
    /// Resolves this input to a canonical point, naming `field` in any
    /// failure message.
    pub fn resolve(&self, field: &str) -> Result<GeoPoint, Error> {
        match self {
            EndpointInput::Pair(values) => {
                if values.len() != 2 {
                    return Err(validation_error(format!(
                        "{} must be [longitude, latitude]",
                        field
                    )));
                }

                let longitude = numeric(&values[0], field)?;
                let latitude = numeric(&values[1], field)?;

                GeoPoint::new(longitude, latitude)
            }
            EndpointInput::Keyed(map) => {
                let longitude = numeric(keyed(map, &LON_KEYS, field)?, field)?;
                let latitude = numeric(keyed(map, &LAT_KEYS, field)?, field)?;

                GeoPoint::new(longitude, latitude)
            }
        }
    }
}

fn keyed<'a>(map: &'a Map<String, Value>, keys: &[&str], field: &str) -> Result<&'a Value, Error> {
    keys.iter().find_map(|key| map.get(*key)).ok_or_else(|| {
        validation_error(format!(
            "{} must carry both a longitude and a latitude field",
            field
        ))
    })
}

fn numeric(value: &Value, field: &str) -> Result<f64, Error> {
    value
        .as_f64()
        .ok_or_else(|| validation_error(format!("{} coordinates must be numbers", field)))
}

/// The coordinate validator: turns the raw request endpoints into two
/// canonical points, or rejects without any store access.
pub fn validate_endpoints(
    start: Option<EndpointInput>,
    end: Option<EndpointInput>,
) -> Result<(GeoPoint, GeoPoint), Error> {
    let start = start.ok_or_else(|| missing("start"))?.resolve("start")?;
    let end = end.ok_or_else(|| missing("end"))?.resolve("end")?;

    Ok((start, end))
}

fn missing(field: &str) -> Error {
    validation_error(format!(
        "{} must be [longitude, latitude] or an object with lon/lat fields",
        field
    ))
}

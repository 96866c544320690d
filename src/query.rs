//! Turning user input into a query point.

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::geocoding::{GeocodeOutcome, Geocoder};
use crate::models::GeoPoint;

/// Raw form input: a place name, explicit coordinates, or both
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryInput {
    pub location: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// The single resolution path chosen for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Location(String),
    Coordinates { latitude: String, longitude: String },
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Query {
    /// Pick the resolution path. A location takes precedence over coordinates.
    pub fn from_input(input: &QueryInput) -> Result<Self, Error> {
        if let Some(location) = present(&input.location) {
            return Ok(Query::Location(location.to_string()));
        }

        match (present(&input.latitude), present(&input.longitude)) {
            (Some(latitude), Some(longitude)) => Ok(Query::Coordinates {
                latitude: latitude.to_string(),
                longitude: longitude.to_string(),
            }),
            _ => Err(Error::MissingInput),
        }
    }
}

/// Resolve user input to a point, geocoding a location string when given.
pub async fn resolve_query(input: &QueryInput, geocoder: &dyn Geocoder) -> Result<GeoPoint, Error> {
    match Query::from_input(input)? {
        Query::Location(text) => {
            debug!("Resolving location '{}'", text);
            match geocoder.geocode(&text).await {
                GeocodeOutcome::Found(point) => Ok(point),
                GeocodeOutcome::NotFound => Err(Error::LocationNotResolved(text)),
                GeocodeOutcome::Unavailable(reason) => Err(Error::GeocodingUnavailable(reason)),
            }
        }
        Query::Coordinates {
            latitude,
            longitude,
        } => GeoPoint::parse(&latitude, &longitude),
    }
}

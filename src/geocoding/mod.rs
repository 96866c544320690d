//! Free-text location to coordinates.

mod nominatim;

pub use nominatim::NominatimGeocoder;

use async_trait::async_trait;

use crate::models::GeoPoint;

/// Result of a single geocoding request
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(GeoPoint),
    /// The service answered but knows no such place
    NotFound,
    /// Timeout, connection failure or a bad response; carries the reason
    Unavailable(String),
}

/// External place-name lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, text: &str) -> GeocodeOutcome;
}

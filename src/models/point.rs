//! Geographic point type.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Geographic point (lat/lon, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range coordinates
    pub fn new(lat: f64, lon: f64) -> Result<Self, Error> {
        let point = Self { lat, lon };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(Error::InvalidCoordinates(format!(
                "({}, {}) is outside latitude [-90, 90] / longitude [-180, 180]",
                lat, lon
            )))
        }
    }

    /// Parse user-entered latitude and longitude strings
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, Error> {
        let lat = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidCoordinates(format!("latitude '{}'", latitude.trim())))?;
        let lon = longitude
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidCoordinates(format!("longitude '{}'", longitude.trim())))?;
        Self::new(lat, lon)
    }

    /// Both coordinates finite and within range
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Unchecked wire form; deserialized points go through [`GeoPoint::new`]
#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = Error;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Error> {
        GeoPoint::new(raw.lat, raw.lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

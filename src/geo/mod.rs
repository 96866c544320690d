//! Distance computation and nearest-record lookup.

mod distance;
mod nearest;

pub use distance::{haversine_km, DistanceError, EARTH_RADIUS_KM};
pub use nearest::{find_nearest, find_nearest_with, MatchResult, ScanPolicy};

//! Great-circle distance on a spherical Earth.

use thiserror::Error;

use crate::models::GeoPoint;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Reasons a distance could not be computed for a pair of points
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DistanceError {
    #[error("non-finite coordinate in {0}")]
    NonFinite(GeoPoint),

    #[error("coordinate {0} is out of range")]
    OutOfRange(GeoPoint),

    #[error("haversine evaluation produced {0}")]
    Domain(f64),
}

fn check(point: &GeoPoint) -> Result<(), DistanceError> {
    if !point.lat.is_finite() || !point.lon.is_finite() {
        return Err(DistanceError::NonFinite(*point));
    }
    if !point.is_valid() {
        return Err(DistanceError::OutOfRange(*point));
    }
    Ok(())
}

/// Haversine distance between two points, in kilometers.
///
/// Never returns NaN: invalid input or a non-finite intermediate is an error.
pub fn haversine_km(p1: &GeoPoint, p2: &GeoPoint) -> Result<f64, DistanceError> {
    check(p1)?;
    check(p2)?;

    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (p2.lon - p1.lon).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    if !a.is_finite() {
        return Err(DistanceError::Domain(a));
    }
    // Rounding can push a just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    let distance = EARTH_RADIUS_KM * c;

    if distance.is_finite() && distance >= 0.0 {
        Ok(distance)
    } else {
        Err(DistanceError::Domain(distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHENNAI: GeoPoint = GeoPoint { lat: 13.0827, lon: 80.2707 };
    const COIMBATORE: GeoPoint = GeoPoint { lat: 11.0168, lon: 76.9558 };

    #[test]
    fn test_same_point_is_zero() {
        let points = [
            CHENNAI,
            COIMBATORE,
            GeoPoint { lat: 90.0, lon: 180.0 },
            GeoPoint { lat: -45.5, lon: -179.9 },
            GeoPoint { lat: 0.0, lon: 0.0 },
        ];
        for p in points {
            assert!(haversine_km(&p, &p).unwrap().abs() < 1e-6, "{}", p);
        }
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            (CHENNAI, COIMBATORE),
            (GeoPoint { lat: 51.5, lon: -0.12 }, GeoPoint { lat: -33.86, lon: 151.2 }),
            (GeoPoint { lat: 0.0, lon: 179.9 }, GeoPoint { lat: 0.0, lon: -179.9 }),
        ];
        for (a, b) in pairs {
            let ab = haversine_km(&a, &b).unwrap();
            let ba = haversine_km(&b, &a).unwrap();
            assert!((ab - ba).abs() < 1e-9, "{} vs {}", ab, ba);
        }
    }

    #[test]
    fn test_chennai_to_coimbatore() {
        // Great-circle distance; the road distance is considerably longer
        let d = haversine_km(&CHENNAI, &COIMBATORE).unwrap();
        assert!((d - 427.43).abs() < 0.5, "got {} km", d);
    }

    #[test]
    fn test_antipodal_points() {
        let d = haversine_km(
            &GeoPoint { lat: 0.0, lon: 0.0 },
            &GeoPoint { lat: 0.0, lon: 180.0 },
        )
        .unwrap();
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_dateline_crossing_is_short() {
        let d = haversine_km(
            &GeoPoint { lat: 0.0, lon: 179.9 },
            &GeoPoint { lat: 0.0, lon: -179.9 },
        )
        .unwrap();
        assert!(d < 25.0, "got {} km", d);
    }

    #[test]
    fn test_non_finite_input_fails() {
        let bad = GeoPoint { lat: f64::NAN, lon: 80.0 };
        assert!(matches!(
            haversine_km(&CHENNAI, &bad),
            Err(DistanceError::NonFinite(_))
        ));
        let inf = GeoPoint { lat: 10.0, lon: f64::INFINITY };
        assert!(matches!(
            haversine_km(&inf, &CHENNAI),
            Err(DistanceError::NonFinite(_))
        ));
    }

    #[test]
    fn test_out_of_range_input_fails() {
        let bad = GeoPoint { lat: 123.0, lon: 80.0 };
        assert!(matches!(
            haversine_km(&CHENNAI, &bad),
            Err(DistanceError::OutOfRange(_))
        ));
    }
}

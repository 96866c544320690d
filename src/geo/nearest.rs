//! Nearest soil record lookup by linear scan.

use serde::Serialize;
use tracing::{debug, warn};

use super::distance::haversine_km;
use crate::error::Error;
use crate::models::{GeoPoint, SoilRecord};

/// What to do with a record whose distance cannot be computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Treat the record as infinitely far away and keep scanning.
    /// Excluded records are counted in [`MatchResult::excluded`].
    #[default]
    SkipInvalid,
    /// Abort the lookup at the first such record.
    Strict,
}

/// Closest record to a query point
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<'a> {
    pub record: &'a SoilRecord,
    /// Position of the record in the table
    pub index: usize,
    pub distance_km: f64,
    /// Records left out because their distance could not be computed
    pub excluded: usize,
}

/// Find the record closest to `query`, skipping records with unusable coordinates.
pub fn find_nearest<'a>(query: &GeoPoint, records: &'a [SoilRecord]) -> Result<MatchResult<'a>, Error> {
    find_nearest_with(query, records, ScanPolicy::SkipInvalid)
}

/// Find the record closest to `query`.
///
/// Ties on the minimum distance go to the record that appears first.
pub fn find_nearest_with<'a>(
    query: &GeoPoint,
    records: &'a [SoilRecord],
    policy: ScanPolicy,
) -> Result<MatchResult<'a>, Error> {
    if records.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let mut best: Option<(usize, f64)> = None;
    let mut excluded = 0;

    for (index, record) in records.iter().enumerate() {
        let distance = match haversine_km(query, &record.location) {
            Ok(d) => d,
            Err(source) => {
                if policy == ScanPolicy::Strict {
                    return Err(Error::InvalidRecord { index, source });
                }
                debug!("Excluding soil record {}: {}", index, source);
                excluded += 1;
                continue;
            }
        };

        // Strict comparison keeps the earliest record on ties
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }

    if excluded > 0 {
        warn!(
            "{} of {} soil records excluded from nearest match for {}",
            excluded,
            records.len(),
            query
        );
    }

    let (index, distance_km) = best.ok_or(Error::DistanceComputationFailed { excluded })?;

    debug!(
        "Nearest soil record to {} is #{} at {:.3} km",
        query, index, distance_km
    );

    Ok(MatchResult {
        record: &records[index],
        index,
        distance_km,
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: f64, lon: f64, soil_type: &str) -> SoilRecord {
        SoilRecord {
            location: GeoPoint { lat, lon },
            soil_type: soil_type.to_string(),
            ph: Some(6.5),
            recommended_crops: "Rice, Sugarcane".to_string(),
            recommended_fertilizer: "Urea".to_string(),
        }
    }

    #[test]
    fn test_returns_closest_record() {
        let records = vec![
            record(13.08, 80.27, "A"),
            record(11.02, 76.96, "B"),
            record(9.93, 78.12, "C"),
        ];
        let query = GeoPoint { lat: 11.1, lon: 77.0 };

        let result = find_nearest(&query, &records).unwrap();
        assert_eq!(result.record.soil_type, "B");
        assert_eq!(result.index, 1);
        assert_eq!(result.excluded, 0);

        for other in &records {
            let d = haversine_km(&query, &other.location).unwrap();
            assert!(result.distance_km <= d);
        }
    }

    #[test]
    fn test_tie_goes_to_first_record() {
        // Both records are 1 degree of latitude from the query
        let records = vec![
            record(5.0, 0.0, "far"),
            record(1.0, 0.0, "north"),
            record(-1.0, 0.0, "south"),
        ];
        let query = GeoPoint { lat: 0.0, lon: 0.0 };

        let result = find_nearest(&query, &records).unwrap();
        assert_eq!(result.record.soil_type, "north");
        assert_eq!(result.index, 1);
    }

    #[test]
    fn test_identical_records_first_wins() {
        let records = vec![record(10.0, 78.0, "first"), record(10.0, 78.0, "second")];
        let result = find_nearest(&GeoPoint { lat: 10.5, lon: 78.5 }, &records).unwrap();
        assert_eq!(result.record.soil_type, "first");
    }

    #[test]
    fn test_empty_dataset() {
        let result = find_nearest(&GeoPoint { lat: 0.0, lon: 0.0 }, &[]);
        assert!(matches!(result, Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_invalid_records_are_excluded() {
        let records = vec![
            record(f64::NAN, f64::NAN, "broken"),
            record(11.0, 77.0, "valid"),
            record(200.0, 77.0, "out of range"),
        ];
        // The broken records would be closest if their coordinates were usable
        let result = find_nearest(&GeoPoint { lat: 0.0, lon: 0.0 }, &records).unwrap();
        assert_eq!(result.record.soil_type, "valid");
        assert_eq!(result.excluded, 2);
    }

    #[test]
    fn test_all_records_invalid() {
        let records = vec![record(f64::NAN, 1.0, "a"), record(1.0, f64::INFINITY, "b")];
        let result = find_nearest(&GeoPoint { lat: 0.0, lon: 0.0 }, &records);
        assert!(matches!(
            result,
            Err(Error::DistanceComputationFailed { excluded: 2 })
        ));
    }

    #[test]
    fn test_strict_policy_aborts_on_invalid_record() {
        let records = vec![record(11.0, 77.0, "valid"), record(f64::NAN, 1.0, "broken")];
        let result = find_nearest_with(&GeoPoint { lat: 0.0, lon: 0.0 }, &records, ScanPolicy::Strict);
        assert!(matches!(result, Err(Error::InvalidRecord { index: 1, .. })));
    }

    #[test]
    fn test_strict_policy_with_clean_data() {
        let records = vec![record(11.0, 77.0, "a"), record(13.0, 80.0, "b")];
        let result =
            find_nearest_with(&GeoPoint { lat: 13.1, lon: 80.1 }, &records, ScanPolicy::Strict)
                .unwrap();
        assert_eq!(result.record.soil_type, "b");
    }
}

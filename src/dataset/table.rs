//! Soil dataset loading.

use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::error::Error;
use crate::geo::{find_nearest_with, MatchResult, ScanPolicy};
use crate::models::{GeoPoint, SoilRecord};

/// Columns every soil dataset must carry
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "latitude",
    "longitude",
    "soil_type",
    "pH",
    "recommended_crops",
    "recommended_fertilizer",
];

/// Column positions resolved from the header row
struct Columns {
    latitude: usize,
    longitude: usize,
    soil_type: usize,
    ph: usize,
    crops: usize,
    fertilizer: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, Error> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        Ok(Self {
            latitude: find(REQUIRED_COLUMNS[0])?,
            longitude: find(REQUIRED_COLUMNS[1])?,
            soil_type: find(REQUIRED_COLUMNS[2])?,
            ph: find(REQUIRED_COLUMNS[3])?,
            crops: find(REQUIRED_COLUMNS[4])?,
            fertilizer: find(REQUIRED_COLUMNS[5])?,
        })
    }
}

/// Read-only, in-memory soil dataset
#[derive(Debug, Clone, Default)]
pub struct SoilTable {
    records: Vec<SoilRecord>,
    malformed_rows: usize,
}

impl SoilTable {
    /// Load a soil dataset from disk.
    ///
    /// `.gz` files are decompressed; `.tsv` files are tab-delimited, anything else uses commas.
    pub fn load(path: &Path) -> Result<Self, Error> {
        info!("Loading soil data from {}", path.display());

        let file = File::open(path)?;
        let is_gz = path.extension().map_or(false, |e| e == "gz");
        let reader: Box<dyn Read> = if is_gz {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .trim_end_matches(".gz");
        let delimiter = if name.ends_with(".tsv") { b'\t' } else { b',' };

        let table = Self::from_reader(reader, delimiter)?;
        info!(
            "Loaded {} soil records ({} malformed)",
            table.len(),
            table.malformed_rows()
        );
        Ok(table)
    }

    /// Parse a delimited soil dataset with a header row
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, Error> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .trim(csv::Trim::Fields)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = Columns::resolve(&headers)?;

        let mut records = Vec::new();
        let mut malformed_rows = 0;

        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or_default();

            let lat = field(columns.latitude).parse::<f64>();
            let lon = field(columns.longitude).parse::<f64>();
            let location = match (lat, lon) {
                (Ok(lat), Ok(lon)) if (GeoPoint { lat, lon }).is_valid() => GeoPoint { lat, lon },
                (lat, lon) => {
                    // Header is line 1, so data row N sits on line N + 2
                    warn!(
                        "Malformed coordinates on line {}: latitude={:?} longitude={:?}",
                        row + 2,
                        field(columns.latitude),
                        field(columns.longitude)
                    );
                    malformed_rows += 1;
                    GeoPoint {
                        lat: lat.unwrap_or(f64::NAN),
                        lon: lon.unwrap_or(f64::NAN),
                    }
                }
            };

            let ph = field(columns.ph).parse::<f64>().ok();
            if ph.is_none() && !field(columns.ph).is_empty() {
                warn!("Unparsable pH on line {}: {:?}", row + 2, field(columns.ph));
            }

            records.push(SoilRecord {
                location,
                soil_type: field(columns.soil_type).to_string(),
                ph,
                recommended_crops: field(columns.crops).to_string(),
                recommended_fertilizer: field(columns.fertilizer).to_string(),
            });
        }

        Ok(Self {
            records,
            malformed_rows,
        })
    }

    /// Nearest record to a point under the given policy
    pub fn nearest(&self, query: &GeoPoint, policy: ScanPolicy) -> Result<MatchResult<'_>, Error> {
        find_nearest_with(query, &self.records, policy)
    }

    pub fn records(&self) -> &[SoilRecord] {
        &self.records
    }

    /// Rows whose coordinates could not be used
    pub fn malformed_rows(&self) -> usize {
        self.malformed_rows
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

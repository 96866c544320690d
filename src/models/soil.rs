//! Soil records and soil type labels.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::GeoPoint;
use crate::error::Error;

/// Soil class produced by the image classifier.
///
/// Variant order matches the classifier's output vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    #[serde(rename = "Black Soil")]
    Black,
    #[serde(rename = "Cinder Soil")]
    Cinder,
    #[serde(rename = "Laterite Soil")]
    Laterite,
    #[serde(rename = "Peat Soil")]
    Peat,
    #[serde(rename = "Yellow Soil")]
    Yellow,
}

impl SoilType {
    /// All soil types in classifier output order
    pub fn all() -> &'static [SoilType] {
        &[
            SoilType::Black,
            SoilType::Cinder,
            SoilType::Laterite,
            SoilType::Peat,
            SoilType::Yellow,
        ]
    }

    /// Soil type for a classifier output index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Human-readable label, as used by the classifier label set
    pub fn label(&self) -> &'static str {
        match self {
            SoilType::Black => "Black Soil",
            SoilType::Cinder => "Cinder Soil",
            SoilType::Laterite => "Laterite Soil",
            SoilType::Peat => "Peat Soil",
            SoilType::Yellow => "Yellow Soil",
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SoilType {
    type Err = Error;

    /// Accepts the full label ("Peat Soil") or the bare name ("peat"), any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SoilType::all()
            .iter()
            .find(|t| {
                let label = t.label().to_lowercase();
                label == wanted || label.strip_suffix(" soil") == Some(wanted.as_str())
            })
            .copied()
            .ok_or_else(|| Error::UnknownSoilType(s.to_string()))
    }
}

/// One row of the static soil dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilRecord {
    /// Sample location; non-finite when the row's coordinates were unparsable
    pub location: GeoPoint,

    /// Free-text soil description from the dataset
    pub soil_type: String,

    #[serde(rename = "pH")]
    pub ph: Option<f64>,

    /// Comma-joined crop names
    pub recommended_crops: String,

    pub recommended_fertilizer: String,
}

//! Soil image classification.
//!
//! The model itself runs elsewhere; this module prepares its input tensor and
//! interprets the probability vector it returns.

mod preprocess;
mod tf_serving;

pub use preprocess::{preprocess, ImageTensor, CHANNELS, INPUT_SIZE};
pub use tf_serving::TfServingClassifier;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Error;
use crate::models::SoilType;

/// Soil image model returning one probability per [`SoilType`], in label order
#[async_trait]
pub trait SoilClassifier: Send + Sync {
    async fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>, Error>;
}

/// Most likely soil type for an image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub soil_type: SoilType,
    /// Probability of `soil_type` as a percentage, two decimals
    pub confidence: f64,
}

impl Classification {
    /// Pick the highest probability; the earliest label wins a tie.
    pub fn from_probabilities(probabilities: &[f32]) -> Result<Self, Error> {
        if probabilities.len() != SoilType::all().len() {
            return Err(Error::ClassifierOutput(format!(
                "expected {} probabilities, got {}",
                SoilType::all().len(),
                probabilities.len()
            )));
        }
        if let Some(bad) = probabilities.iter().find(|p| !p.is_finite()) {
            return Err(Error::ClassifierOutput(format!("non-finite probability {}", bad)));
        }

        let (index, probability) = probabilities
            .iter()
            .enumerate()
            .fold((0, probabilities[0]), |best, (i, &p)| if p > best.1 { (i, p) } else { best });

        let soil_type = SoilType::from_index(index)
            .ok_or_else(|| Error::ClassifierOutput(format!("no label for index {}", index)))?;
        let confidence = (f64::from(probability) * 10_000.0).round() / 100.0;

        Ok(Self {
            soil_type,
            confidence,
        })
    }
}

/// Preprocess an uploaded image and classify it
///
/// Decoding and resizing run on the blocking pool.
pub async fn classify(
    classifier: &dyn SoilClassifier,
    image: Vec<u8>,
) -> Result<Classification, Error> {
    let tensor = tokio::task::spawn_blocking(move || preprocess(&image))
        .await
        .map_err(|e| Error::BackgroundTask(e.to_string()))??;
    let probabilities = classifier.predict(&tensor).await?;
    Classification::from_probabilities(&probabilities)
}

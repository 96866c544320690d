//! TensorFlow Serving REST client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{ImageTensor, SoilClassifier, CHANNELS};
use crate::endpoint::endpoint_url;
use crate::error::Error;

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<Vec<Vec<[f32; CHANNELS]>>>,
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<Vec<f32>>,
}

/// Classifier served by `POST {url}/v1/models/{model}:predict`
pub struct TfServingClassifier {
    client: Client,
    predict_url: Url,
}

impl TfServingClassifier {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let predict_url = endpoint_url(base_url, &format!("v1/models/{}:predict", model))
            .context("Invalid classifier URL")?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            predict_url,
        })
    }
}

#[async_trait]
impl SoilClassifier for TfServingClassifier {
    async fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>, Error> {
        let body = PredictRequest {
            instances: vec![tensor.to_nested()],
        };

        let response = self
            .client
            .post(self.predict_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Classifier request failed: {}", e);
                Error::ClassifierUnavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Classifier returned {}: {}", status, text);
            return Err(Error::ClassifierUnavailable(format!("service returned {}", status)));
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| Error::ClassifierOutput(e.to_string()))?;

        let probabilities = parsed
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| Error::ClassifierOutput("empty predictions".to_string()))?;

        debug!("Classifier probabilities: {:?}", probabilities);
        Ok(probabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::preprocess;
    use crate::classifier::preprocess::tests::solid_png;
    use mockito::Matcher;

    fn tensor() -> ImageTensor {
        preprocess(&solid_png(8, 8, [10, 20, 30])).unwrap()
    }

    #[tokio::test]
    async fn test_predict_reads_first_prediction() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/models/soil:predict")
            .match_body(Matcher::Regex(r#"^\{"instances":\[\[\[\["#.to_string()))
            .with_status(200)
            .with_body(r#"{"predictions": [[0.1, 0.2, 0.3, 0.15, 0.25]]}"#)
            .create_async()
            .await;

        let classifier =
            TfServingClassifier::new(&server.url(), "soil", Duration::from_secs(5)).unwrap();
        let probabilities = classifier.predict(&tensor()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(probabilities, vec![0.1, 0.2, 0.3, 0.15, 0.25]);
    }

    #[tokio::test]
    async fn test_predict_below_path_prefix() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/serving/v1/models/soil:predict")
            .with_status(200)
            .with_body(r#"{"predictions": [[0.2, 0.2, 0.2, 0.2, 0.2]]}"#)
            .create_async()
            .await;

        let base = format!("{}/serving", server.url());
        let classifier = TfServingClassifier::new(&base, "soil", Duration::from_secs(5)).unwrap();
        classifier.predict(&tensor()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/models/soil:predict")
            .with_status(500)
            .with_body("model not loaded")
            .create_async()
            .await;

        let classifier =
            TfServingClassifier::new(&server.url(), "soil", Duration::from_secs(5)).unwrap();
        let result = classifier.predict(&tensor()).await;
        assert!(matches!(result, Err(Error::ClassifierUnavailable(_))));
    }

    #[tokio::test]
    async fn test_empty_predictions() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/models/soil:predict")
            .with_status(200)
            .with_body(r#"{"predictions": []}"#)
            .create_async()
            .await;

        let classifier =
            TfServingClassifier::new(&server.url(), "soil", Duration::from_secs(5)).unwrap();
        let result = classifier.predict(&tensor()).await;
        assert!(matches!(result, Err(Error::ClassifierOutput(_))));
    }
}

//! Nominatim (OpenStreetMap) search client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{GeocodeOutcome, Geocoder};
use crate::endpoint::endpoint_url;
use crate::models::GeoPoint;

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocoder backed by a Nominatim `/search` endpoint
pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let search_url = endpoint_url(base_url, "search").context("Invalid geocoder URL")?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, search_url })
    }

    fn request_url(&self, text: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", text)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");
        url
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, text: &str) -> GeocodeOutcome {
        let response = match self.client.get(self.request_url(text)).send().await {
            Ok(r) => r,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    format!("request failed: {}", e)
                };
                warn!("Geocoding '{}' failed: {}", text, reason);
                return GeocodeOutcome::Unavailable(reason);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Geocoder answered '{}' with status {}", text, status);
            return GeocodeOutcome::Unavailable(format!("service returned {}", status));
        }

        let hits: Vec<SearchHit> = match response.json().await {
            Ok(h) => h,
            Err(e) => {
                warn!("Failed to parse geocoder response for '{}': {}", text, e);
                return GeocodeOutcome::Unavailable("unexpected response".to_string());
            }
        };

        let Some(hit) = hits.into_iter().next() else {
            debug!("No geocoding result for '{}'", text);
            return GeocodeOutcome::NotFound;
        };

        match GeoPoint::parse(&hit.lat, &hit.lon) {
            Ok(point) => {
                debug!(
                    "Geocoded '{}' to {} ({})",
                    text,
                    point,
                    hit.display_name.as_deref().unwrap_or("unnamed")
                );
                GeocodeOutcome::Found(point)
            }
            Err(e) => {
                warn!("Geocoder returned unusable coordinates for '{}': {}", text, e);
                GeocodeOutcome::Unavailable("unexpected response".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn geocoder(url: &str) -> NominatimGeocoder {
        NominatimGeocoder::new(url, "yuvaa-test", Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Coimbatore, Tamil Nadu".into()),
                Matcher::UrlEncoded("format".into(), "jsonv2".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .match_header("user-agent", "yuvaa-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"lat": "11.0168", "lon": "76.9558", "display_name": "Coimbatore"}]"#)
            .create_async()
            .await;

        let outcome = geocoder(&server.url())
            .geocode("Coimbatore, Tamil Nadu")
            .await;

        mock.assert_async().await;
        assert_eq!(
            outcome,
            GeocodeOutcome::Found(GeoPoint { lat: 11.0168, lon: 76.9558 })
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let outcome = geocoder(&server.url()).geocode("Atlantis").await;
        assert_eq!(outcome, GeocodeOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let outcome = geocoder(&server.url()).geocode("Chennai").await;
        assert!(matches!(outcome, GeocodeOutcome::Unavailable(ref r) if r.contains("503")));
    }

    #[tokio::test]
    async fn test_garbage_body_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>rate limited</html>")
            .create_async()
            .await;

        let outcome = geocoder(&server.url()).geocode("Chennai").await;
        assert!(matches!(outcome, GeocodeOutcome::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        // Nothing listens on port 1
        let outcome = geocoder("http://127.0.0.1:1").geocode("Madurai").await;
        assert!(matches!(outcome, GeocodeOutcome::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and never answer
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let g = NominatimGeocoder::new(
            &format!("http://{}", addr),
            "yuvaa-test",
            Duration::from_millis(300),
        )
        .unwrap();
        let outcome = g.geocode("Erode").await;
        assert!(matches!(outcome, GeocodeOutcome::Unavailable(ref r) if r.contains("timed out")));
    }

    #[test]
    fn test_request_url_without_trailing_slash() {
        let g = geocoder("https://geo.example.org/nominatim");
        let url = g.request_url("Salem");
        assert_eq!(
            url.as_str(),
            "https://geo.example.org/nominatim/search?q=Salem&format=jsonv2&limit=1"
        );
    }

    #[test]
    fn test_request_url_keeps_base_path() {
        let g = geocoder("https://geo.example.org/nominatim/");
        let url = g.request_url("Salem");
        assert_eq!(
            url.as_str(),
            "https://geo.example.org/nominatim/search?q=Salem&format=jsonv2&limit=1"
        );
    }
}

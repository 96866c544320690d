use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::geo::ScanPolicy;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub geocoder: GeocoderConfig,
    /// Prediction is disabled when absent
    pub classifier: Option<ClassifierConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    /// Abort lookups on records with unusable coordinates instead of skipping them
    pub strict: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tamilnadu_soil_data.csv"),
            strict: false,
        }
    }
}

impl DatasetConfig {
    pub fn scan_policy(&self) -> ScanPolicy {
        if self.strict {
            ScanPolicy::Strict
        } else {
            ScanPolicy::SkipInvalid
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("yuvaa/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "soil".to_string()
}

fn default_classifier_timeout() -> u64 {
    30
}

impl ClassifierConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            model: default_model(),
            timeout_secs: default_classifier_timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}

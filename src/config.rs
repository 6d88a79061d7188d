//! Extractor configuration sourced from environment variables

use eyre::{Context, Result};
use url::Url;

pub const DEFAULT_DATASET_NAME: &str = "wikimedia/wikipedia";
pub const DEFAULT_SUBSET: &str = "20220301.en";
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
pub const DEFAULT_CONTAINER_NAME: &str = "wikipedia-raw";
pub const DEFAULT_DATASETS_SERVER_URL: &str = "https://datasets-server.huggingface.co";

/// Settings shared by every extractor operation
///
/// Read once at startup and never mutated afterwards.
///
/// Environment variables:
/// - WIKIPEDIA_DATASET_NAME: dataset identifier (default: wikimedia/wikipedia)
/// - WIKIPEDIA_SUBSET: dataset config (default: 20220301.en)
/// - WIKIPEDIA_SAMPLE_SIZE: records to load (default: 1000)
/// - AZURE_STORAGE_CONTAINER_NAME: upload container (default: wikipedia-raw)
/// - AZURE_STORAGE_CONNECTION_STRING: storage credential (required for uploads)
/// - HF_DATASETS_SERVER_URL: datasets-server base URL
/// - HF_TOKEN: bearer token for gated datasets (optional)
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractorConfig {
    pub dataset_name: String,
    pub subset: String,
    pub sample_size: usize,
    pub container_name: String,
    pub connection_string: Option<String>,
    pub datasets_server_url: Url,
    pub hf_token: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            subset: DEFAULT_SUBSET.to_string(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            container_name: DEFAULT_CONTAINER_NAME.to_string(),
            connection_string: None,
            datasets_server_url: Url::parse(DEFAULT_DATASETS_SERVER_URL)
                .expect("default datasets-server URL is valid"),
            hf_token: None,
        }
    }
}

impl ExtractorConfig {
    /// Load configuration from the process environment
    ///
    /// Call after sourcing any dotenv file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    /// Returns an error if the sample size is not a non-negative integer or the
    /// datasets-server URL does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let sample_size = match get("WIKIPEDIA_SAMPLE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid WIKIPEDIA_SAMPLE_SIZE: {}", raw))?,
            None => defaults.sample_size,
        };

        let datasets_server_url = match get("HF_DATASETS_SERVER_URL") {
            Some(raw) => Url::parse(raw.trim())
                .with_context(|| format!("Invalid HF_DATASETS_SERVER_URL: {}", raw))?,
            None => defaults.datasets_server_url,
        };

        Ok(Self {
            dataset_name: get("WIKIPEDIA_DATASET_NAME").unwrap_or(defaults.dataset_name),
            subset: get("WIKIPEDIA_SUBSET").unwrap_or(defaults.subset),
            sample_size,
            container_name: get("AZURE_STORAGE_CONTAINER_NAME").unwrap_or(defaults.container_name),
            connection_string: get("AZURE_STORAGE_CONNECTION_STRING"),
            datasets_server_url,
            hf_token: get("HF_TOKEN"),
        })
    }
}

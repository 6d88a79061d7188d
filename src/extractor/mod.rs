//! The Wikipedia data extractor
//!
//! [`DataExtractor`] owns the configuration and the two external
//! collaborators (dataset source and blob connector) and exposes three
//! independent operations: load a sample, derive metadata, save an article.

mod stages;

pub use stages::{ArticleSampler, BlobUploader, MetadataTransformer};

use crate::client::AzureConnector;
use crate::config::ExtractorConfig;
use crate::dataset::{Article, DatasetSource, HubClient, Metadata, TRAIN_SPLIT, blob_name};
use crate::storage::{BlobConnector, BlobSink, JSON_CONTENT_TYPE};
use chrono::Utc;
use eyre::{Context, Result};

/// Derive metadata for `article`, stamped with the current UTC time
///
/// # Errors
/// Returns (and logs) an error if the article is not a JSON object
pub fn extract_metadata(article: &Article) -> Result<Metadata> {
    Metadata::from_article(article, Utc::now())
        .inspect_err(|e| log::error!("Error extracting metadata: {}", e))
}

pub struct DataExtractor<D, C> {
    config: ExtractorConfig,
    source: D,
    connector: C,
}

impl DataExtractor<HubClient, AzureConnector> {
    /// Extractor backed by the Hugging Face datasets-server and Azure Blob Storage
    pub fn from_config(config: ExtractorConfig) -> Result<Self> {
        let source = HubClient::try_new(
            config.datasets_server_url.clone(),
            config.hf_token.as_deref(),
        )
        .context("Failed to create datasets-server client")?;
        Ok(Self::new(config, source, AzureConnector))
    }
}

impl<D, C> DataExtractor<D, C>
where
    D: DatasetSource,
    C: BlobConnector,
{
    pub fn new(config: ExtractorConfig, source: D, connector: C) -> Self {
        Self {
            config,
            source,
            connector,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Load the first `size` articles of the configured dataset's train split
    ///
    /// `size` defaults to the configured sample size. The sample is the
    /// leading rows in source order, not a random draw.
    ///
    /// # Errors
    /// Returns (and logs) any dataset source error, and fails when the split
    /// holds fewer than `size` rows.
    pub async fn load_sample(&self, size: Option<usize>) -> Result<Vec<Article>> {
        let size = size.unwrap_or(self.config.sample_size);
        let (name, subset) = (&self.config.dataset_name, &self.config.subset);

        if size == 0 {
            log::info!("Sample size is 0, nothing to load");
            return Ok(Vec::new());
        }

        log::info!("Loading Wikipedia dataset {}/{}", name, subset);
        log::info!("Selecting {} articles from dataset", size);
        let result: Result<Vec<Article>> = async {
            let mut articles = self.source.load(name, subset, TRAIN_SPLIT, size).await?;
            if articles.len() < size {
                eyre::bail!(
                    "Dataset {}/{} has {} rows in split '{}', {} requested",
                    name,
                    subset,
                    articles.len(),
                    TRAIN_SPLIT,
                    size
                );
            }
            articles.truncate(size);
            Ok(articles)
        }
        .await;

        let articles =
            result.inspect_err(|e| log::error!("Error loading Wikipedia dataset: {:#}", e))?;
        log::info!("Successfully loaded {} articles", articles.len());
        Ok(articles)
    }

    /// Derive metadata for one article
    ///
    /// See [`extract_metadata`].
    pub fn extract_metadata(&self, article: &Article) -> Result<Metadata> {
        extract_metadata(article)
    }

    /// Upload `article` as JSON to `container` (default: the configured one)
    ///
    /// Returns `false` instead of failing: without a connection string no
    /// connection is attempted, and any storage error is logged.
    pub async fn save_article(&self, article: &Article, container: Option<&str>) -> bool {
        let container = container.unwrap_or(&self.config.container_name);

        let Some(connection_string) = self
            .config
            .connection_string
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        else {
            log::error!("Missing Azure Storage connection string");
            return false;
        };

        match self.upload(connection_string, article, container).await {
            Ok(name) => {
                log::info!("Successfully uploaded article to {}", name);
                true
            }
            Err(e) => {
                log::error!("Error saving to Blob Storage: {:#}", e);
                false
            }
        }
    }

    async fn upload(
        &self,
        connection_string: &str,
        article: &Article,
        container: &str,
    ) -> Result<String> {
        let sink = self
            .connector
            .connect(connection_string)
            .context("Failed to connect to blob storage")?;

        if !sink.container_exists(container).await? {
            log::info!("Creating container {}", container);
            sink.create_container(container).await?;
        }

        let name = blob_name(article);
        let body = serde_json::to_vec(article).context("Failed to serialize article")?;
        sink.upload_blob(container, &name, body, JSON_CONTENT_TYPE)
            .await?;

        Ok(name)
    }
}

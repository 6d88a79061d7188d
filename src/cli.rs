//! CLI helper functions

use crate::{
    client::AzureConnector,
    config::ExtractorConfig,
    dataset::{DatasetSource, HubClient},
    etl::{IdentityTransformer, Pipeline},
    extractor::{ArticleSampler, BlobUploader, DataExtractor, MetadataTransformer},
    storage::{BlobConnector, NdjsonReader, NdjsonWriter},
};
use eyre::{Context, Result};
use std::path::Path;

/// Build the production extractor from environment variables
///
/// See [`ExtractorConfig`] for the variables read.
pub fn load_extractor() -> Result<DataExtractor<HubClient, AzureConnector>> {
    let config = ExtractorConfig::from_env().context("Failed to read configuration")?;
    log::debug!(
        "Dataset {}/{}, sample size {}, container {}",
        config.dataset_name,
        config.subset,
        config.sample_size,
        config.container_name
    );
    DataExtractor::from_config(config)
}

/// Save a dataset sample to an NDJSON file
///
/// Pipeline: ArticleSampler → IdentityTransformer → NdjsonWriter
pub async fn write_sample<D, C>(
    extractor: &DataExtractor<D, C>,
    size: Option<usize>,
    output: impl AsRef<Path>,
) -> Result<usize>
where
    D: DatasetSource,
    C: BlobConnector,
{
    let output = output.as_ref();
    log::info!("Writing sample to {}", output.display());

    Pipeline::new(
        ArticleSampler::new(extractor, size),
        IdentityTransformer::new(),
        NdjsonWriter::new(output),
    )
    .run()
    .await
}

/// Save metadata for a dataset sample to an NDJSON file
///
/// Pipeline: ArticleSampler → MetadataTransformer → NdjsonWriter
pub async fn write_metadata<D, C>(
    extractor: &DataExtractor<D, C>,
    size: Option<usize>,
    output: impl AsRef<Path>,
) -> Result<usize>
where
    D: DatasetSource,
    C: BlobConnector,
{
    let output = output.as_ref();
    log::info!("Writing metadata to {}", output.display());

    Pipeline::new(
        ArticleSampler::new(extractor, size),
        MetadataTransformer,
        NdjsonWriter::new(output),
    )
    .run()
    .await
}

/// Upload a fresh dataset sample to blob storage
///
/// Pipeline: ArticleSampler → IdentityTransformer → BlobUploader
pub async fn upload_sample<D, C>(
    extractor: &DataExtractor<D, C>,
    size: Option<usize>,
    container: Option<String>,
) -> Result<usize>
where
    D: DatasetSource,
    C: BlobConnector,
{
    Pipeline::new(
        ArticleSampler::new(extractor, size),
        IdentityTransformer::new(),
        BlobUploader::new(extractor, container),
    )
    .run()
    .await
}

/// Upload articles previously saved with [`write_sample`]
///
/// Pipeline: NdjsonReader → IdentityTransformer → BlobUploader
pub async fn upload_file<D, C>(
    extractor: &DataExtractor<D, C>,
    input: impl AsRef<Path>,
    size: Option<usize>,
    container: Option<String>,
) -> Result<usize>
where
    D: DatasetSource,
    C: BlobConnector,
{
    let input = input.as_ref();
    log::info!("Reading articles from {}", input.display());

    Pipeline::new(
        NdjsonReader::new(input).with_limit(size),
        IdentityTransformer::new(),
        BlobUploader::new(extractor, container),
    )
    .run()
    .await
}

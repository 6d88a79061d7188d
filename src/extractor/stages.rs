//! ETL stages over a [`DataExtractor`]

use super::{DataExtractor, extract_metadata};
use crate::dataset::{Article, DatasetSource, Metadata, blob_name};
use crate::etl::{Extractor, Loader, Transformer};
use crate::storage::BlobConnector;
use eyre::Result;

/// Extracts a dataset sample through [`DataExtractor::load_sample`]
pub struct ArticleSampler<'a, D, C> {
    extractor: &'a DataExtractor<D, C>,
    size: Option<usize>,
}

impl<'a, D, C> ArticleSampler<'a, D, C> {
    /// Sample `size` articles, or the configured sample size when `None`
    pub fn new(extractor: &'a DataExtractor<D, C>, size: Option<usize>) -> Self {
        Self { extractor, size }
    }
}

impl<D, C> Extractor for ArticleSampler<'_, D, C>
where
    D: DatasetSource,
    C: BlobConnector,
{
    type Item = Article;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        self.extractor.load_sample(self.size).await
    }
}

/// Maps articles to [`Metadata`]
#[derive(Clone, Copy, Debug, Default)]
pub struct MetadataTransformer;

impl Transformer for MetadataTransformer {
    type Input = Article;
    type Output = Metadata;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        extract_metadata(&input)
    }
}

/// Uploads each article with [`DataExtractor::save_article`]
///
/// Failed uploads are logged and skipped; the returned count only includes
/// articles that reached storage.
pub struct BlobUploader<'a, D, C> {
    extractor: &'a DataExtractor<D, C>,
    container: Option<String>,
}

impl<'a, D, C> BlobUploader<'a, D, C> {
    /// Upload into `container`, or the configured container when `None`
    pub fn new(extractor: &'a DataExtractor<D, C>, container: Option<String>) -> Self {
        Self {
            extractor,
            container,
        }
    }
}

impl<D, C> Loader for BlobUploader<'_, D, C>
where
    D: DatasetSource,
    C: BlobConnector,
{
    type Item = Article;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        let total = items.len();
        let mut uploaded = 0;

        for article in &items {
            if self
                .extractor
                .save_article(article, self.container.as_deref())
                .await
            {
                uploaded += 1;
            } else {
                log::warn!("Skipped {}", blob_name(article));
            }
        }

        if uploaded < total {
            log::warn!("{} of {} article(s) failed to upload", total - uploaded, total);
        }
        Ok(uploaded)
    }
}

//! Extractor trait for pulling records out of a source

use eyre::Result;

/// Extractor trait for extracting records from a source
///
/// Implemented by the dataset sampler (Hugging Face rows) and by the NDJSON
/// reader for samples previously saved to disk.
///
/// # Example
/// ```no_run
/// use wikipedia_extractor::etl::Extractor;
/// use eyre::Result;
/// use serde_json::{Value, json};
///
/// struct FixedArticles;
///
/// impl Extractor for FixedArticles {
///     type Item = Value;
///
///     async fn extract(&self) -> Result<Vec<Self::Item>> {
///         Ok(vec![json!({"id": "1", "title": "Anarchism"})])
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The type of items extracted
    type Item: Send;

    /// Extract items from the source, in source order
    ///
    /// # Errors
    /// Returns an error if extraction fails (network, I/O, parsing, etc.)
    fn extract(&self) -> impl std::future::Future<Output = Result<Vec<Self::Item>>> + Send;
}

//! Dataset source capability

use super::Article;
use eyre::Result;

/// Split every sample is drawn from
pub const TRAIN_SPLIT: &str = "train";

/// A named dataset that can hand back its leading records
///
/// # Example
/// ```no_run
/// use wikipedia_extractor::dataset::{Article, DatasetSource};
/// use eyre::Result;
///
/// struct Empty;
///
/// impl DatasetSource for Empty {
///     async fn load(&self, _: &str, _: &str, _: &str, _: usize) -> Result<Vec<Article>> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait DatasetSource: Send + Sync {
    /// Load up to `limit` records of `name`/`subset`/`split`, in source order
    ///
    /// Returning fewer than `limit` records means the split is exhausted.
    ///
    /// # Errors
    /// Returns an error on network failures, unknown datasets or malformed rows
    fn load(
        &self,
        name: &str,
        subset: &str,
        split: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Article>>> + Send;
}

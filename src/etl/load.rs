//! Loader trait for writing records to a destination

use eyre::Result;

/// Loader trait for loading records to a destination
///
/// Implemented by the blob uploader and the NDJSON writer.
///
/// # Example
/// ```no_run
/// use wikipedia_extractor::etl::Loader;
/// use eyre::Result;
/// use serde_json::Value;
///
/// struct CountingLoader;
///
/// impl Loader for CountingLoader {
///     type Item = Value;
///
///     async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
///         Ok(items.len())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// The type of items to load
    type Item: Send;

    /// Load items to the destination
    ///
    /// Returns the number of items successfully loaded, which may be lower
    /// than `items.len()` for loaders that skip failed records.
    ///
    /// # Errors
    /// Returns an error if the destination as a whole cannot be written
    fn load(&self, items: Vec<Self::Item>)
    -> impl std::future::Future<Output = Result<usize>> + Send;
}

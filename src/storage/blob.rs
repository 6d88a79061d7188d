//! Blob sink capabilities

use eyre::Result;
use std::future::Future;

/// Content type of every uploaded article
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A container/blob key-value store
///
/// Uploads always overwrite an existing blob of the same name.
pub trait BlobSink: Send + Sync {
    /// Check whether `container` exists
    fn container_exists(&self, container: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Create `container`; creating one that already exists is not an error
    fn create_container(&self, container: &str) -> impl Future<Output = Result<()>> + Send;

    /// Write `body` to `container/name`, replacing any previous content
    fn upload_blob(
        &self,
        container: &str,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Opens a [`BlobSink`] from an opaque connection string
pub trait BlobConnector: Send + Sync {
    type Sink: BlobSink;

    /// # Errors
    /// Returns an error if the connection string is malformed
    fn connect(&self, connection_string: &str) -> Result<Self::Sink>;
}

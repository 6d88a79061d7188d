//! In-memory blob store
//!
//! Behaves like a storage account without the network: containers must be
//! created before uploads land in them. Clones share the same contents, so a
//! test can hand one clone to the extractor and inspect another.

use super::{BlobConnector, BlobSink};
use eyre::{Result, eyre};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Debug, PartialEq)]
pub struct StoredBlob {
    pub body: Vec<u8>,
    pub content_type: String,
}

impl StoredBlob {
    /// Parse the blob body as JSON
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[derive(Debug, Default)]
struct State {
    containers: BTreeMap<String, BTreeMap<String, StoredBlob>>,
    connections: Vec<String>,
    unavailable: bool,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryBlobStore {
    state: Arc<Mutex<State>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `container` already present
    pub fn with_container(self, container: &str) -> Self {
        self.lock()
            .containers
            .entry(container.to_string())
            .or_default();
        self
    }

    /// Make every operation fail, as an unreachable account would
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.lock().containers.contains_key(container)
    }

    pub fn blob(&self, container: &str, name: &str) -> Option<StoredBlob> {
        self.lock()
            .containers
            .get(container)
            .and_then(|blobs| blobs.get(name))
            .cloned()
    }

    /// Blob names in `container`, sorted
    pub fn blob_names(&self, container: &str) -> Vec<String> {
        self.lock()
            .containers
            .get(container)
            .map(|blobs| blobs.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Connection strings passed to [`BlobConnector::connect`], in call order
    pub fn connections(&self) -> Vec<String> {
        self.lock().connections.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn available(&self) -> Result<MutexGuard<'_, State>> {
        let state = self.lock();
        if state.unavailable {
            eyre::bail!("Blob store is unavailable");
        }
        Ok(state)
    }
}

impl BlobSink for MemoryBlobStore {
    async fn container_exists(&self, container: &str) -> Result<bool> {
        Ok(self.available()?.containers.contains_key(container))
    }

    async fn create_container(&self, container: &str) -> Result<()> {
        self.available()?
            .containers
            .entry(container.to_string())
            .or_default();
        Ok(())
    }

    async fn upload_blob(
        &self,
        container: &str,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let mut state = self.available()?;
        let blobs = state
            .containers
            .get_mut(container)
            .ok_or_else(|| eyre!("Container {} does not exist", container))?;
        blobs.insert(
            name.to_string(),
            StoredBlob {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

impl BlobConnector for MemoryBlobStore {
    type Sink = MemoryBlobStore;

    fn connect(&self, connection_string: &str) -> Result<Self::Sink> {
        self.lock()
            .connections
            .push(connection_string.to_string());
        Ok(self.clone())
    }
}

//! Storage sinks and local files
//!
//! This module handles:
//! - The blob sink capability the extractor uploads through
//! - An in-memory blob store
//! - NDJSON file reading/writing

mod blob;
mod memory;
mod ndjson;

pub use blob::{BlobConnector, BlobSink, JSON_CONTENT_TYPE};
pub use memory::{MemoryBlobStore, StoredBlob};
pub use ndjson::{NdjsonReader, NdjsonWriter};

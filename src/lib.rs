//! Wikipedia Extractor
//!
//! Samples Wikipedia articles from a Hugging Face dataset, derives metadata,
//! and uploads each article as a JSON blob to Azure Blob Storage.

pub mod cli;
pub mod client;
pub mod config;
pub mod dataset;
pub mod etl;
pub mod extractor;
pub mod storage;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use client::{AzureBlobClient, AzureConnector, ConnectionString};
pub use config::ExtractorConfig;
pub use dataset::{Article, DatasetSource, HubClient, Metadata, blob_name};
pub use etl::{Extractor, IdentityTransformer, Loader, Pipeline, Transformer};
pub use extractor::{DataExtractor, extract_metadata};
pub use storage::{BlobConnector, BlobSink, MemoryBlobStore, NdjsonReader, NdjsonWriter};

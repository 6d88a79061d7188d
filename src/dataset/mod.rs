//! Dataset access and article models
//!
//! [`DatasetSource`] is the capability the extractor loads articles through.
//! [`HubClient`] implements it against the Hugging Face datasets-server.

mod hub;
mod models;
mod source;

pub use hub::{HubClient, MAX_PAGE_LENGTH, RowEntry, RowsPage};
pub use models::{Article, Metadata, blob_name};
pub use source::{DatasetSource, TRAIN_SPLIT};

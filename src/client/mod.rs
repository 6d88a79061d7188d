//! Azure Blob Storage client and credentials.
//!
//! This module provides the [`AzureBlobClient`] for the Blob service REST API,
//! along with connection string parsing ([`ConnectionString`]) and request
//! authorization ([`Auth`]).

mod auth;
mod azure;
mod connection;

pub use auth::Auth;
pub use azure::{API_VERSION, AzureBlobClient, AzureConnector};
pub use connection::{ConnectionString, DEVELOPMENT_ACCOUNT_KEY, DEVELOPMENT_ACCOUNT_NAME};

//! Azure Blob Storage client
//!
//! Speaks the Blob service REST API directly with reqwest: container
//! existence checks, container creation and block blob uploads.

use super::{Auth, ConnectionString};
use crate::storage::{BlobConnector, BlobSink};
use chrono::Utc;
use eyre::{Context, Result, eyre};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use url::Url;

/// Blob service REST version every request is pinned to
pub const API_VERSION: &str = "2021-08-06";

/// Client for one storage account's blob endpoint
///
/// # Example
/// ```no_run
/// use wikipedia_extractor::client::AzureBlobClient;
/// use wikipedia_extractor::storage::BlobSink;
///
/// # async fn example() -> eyre::Result<()> {
/// let client = AzureBlobClient::from_connection_string("UseDevelopmentStorage=true")?;
/// if !client.container_exists("wikipedia-raw").await? {
///     client.create_container("wikipedia-raw").await?;
/// }
/// client
///     .upload_blob("wikipedia-raw", "1-A.json", b"{}".to_vec(), "application/json")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AzureBlobClient {
    client: Client,
    endpoint: Url,
    auth: Auth,
}

impl AzureBlobClient {
    /// Create a client from a parsed connection string
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn try_new(connection: ConnectionString) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: connection.blob_endpoint,
            auth: connection.auth,
        })
    }

    /// Parse `connection_string` and create a client for it
    pub fn from_connection_string(connection_string: &str) -> Result<Self> {
        let connection: ConnectionString = connection_string
            .parse()
            .with_context(|| "Invalid Azure Storage connection string")?;
        log::debug!("Connecting to blob storage at {}", connection);
        Self::try_new(connection)
    }

    fn container_url(&self, container: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| eyre!("Blob endpoint {} cannot hold a path", self.endpoint))?
            .pop_if_empty()
            .push(container);
        Ok(url)
    }

    fn container_resource_url(&self, container: &str) -> Result<Url> {
        let mut url = self.container_url(container)?;
        url.set_query(Some("restype=container"));
        Ok(url)
    }

    fn blob_url(&self, container: &str, blob: &str) -> Result<Url> {
        let mut url = self.container_url(container)?;
        url.path_segments_mut()
            .map_err(|_| eyre!("Blob endpoint {} cannot hold a path", self.endpoint))?
            .push(blob);
        Ok(url)
    }

    /// Send a dated, authorized request.
    async fn request(
        &self,
        method: Method,
        mut url: Url,
        mut headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        headers.insert("x-ms-date", HeaderValue::from_str(&date)?);
        headers.insert("x-ms-version", HeaderValue::from_static(API_VERSION));

        let content_length = body.as_ref().map_or(0, Vec::len);
        self.auth
            .apply(&method, &mut url, &mut headers, content_length)?;

        log::trace!("{} {}", method, url.path());
        let request = self.client.request(method, url).headers(headers);
        let response = match body {
            Some(body) => request.body(body).send().await,
            None => request.send().await,
        };
        response.map_err(|e| eyre!("Failed to send request: {}", e))
    }
}

/// Describe a failed response using the service error code when present
async fn failure(response: reqwest::Response) -> String {
    let status = response.status();
    let code = response
        .headers()
        .get("x-ms-error-code")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.unwrap_or_default();
    match code {
        Some(code) => format!("{} {}: {}", status, code, body),
        None => format!("{}: {}", status, body),
    }
}

impl BlobSink for AzureBlobClient {
    async fn container_exists(&self, container: &str) -> Result<bool> {
        let url = self.container_resource_url(container)?;
        let response = self
            .request(Method::HEAD, url, HeaderMap::new(), None)
            .await
            .with_context(|| format!("Failed to check container {}", container))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => eyre::bail!(
                "Failed to check container {} ({})",
                container,
                failure(response).await
            ),
        }
    }

    async fn create_container(&self, container: &str) -> Result<()> {
        let url = self.container_resource_url(container)?;
        let response = self
            .request(Method::PUT, url, HeaderMap::new(), Some(Vec::new()))
            .await
            .with_context(|| format!("Failed to create container {}", container))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            // Someone else created it between the existence check and now
            StatusCode::CONFLICT => {
                log::debug!("Container {} already exists", container);
                Ok(())
            }
            _ => eyre::bail!(
                "Failed to create container {} ({})",
                container,
                failure(response).await
            ),
        }
    }

    async fn upload_blob(
        &self,
        container: &str,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let url = self.blob_url(container, name)?;
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-ms-blob-type"),
            HeaderValue::from_static("BlockBlob"),
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_str(content_type)?,
        );

        let size = body.len();
        let response = self
            .request(Method::PUT, url, headers, Some(body))
            .await
            .with_context(|| format!("Failed to upload {}/{}", container, name))?;

        if !response.status().is_success() {
            eyre::bail!(
                "Failed to upload {}/{} ({})",
                container,
                name,
                failure(response).await
            );
        }

        log::debug!("Uploaded {} bytes to {}/{}", size, container, name);
        Ok(())
    }
}

/// Connects to Azure Blob Storage from a connection string
#[derive(Clone, Copy, Debug, Default)]
pub struct AzureConnector;

impl BlobConnector for AzureConnector {
    type Sink = AzureBlobClient;

    fn connect(&self, connection_string: &str) -> Result<Self::Sink> {
        AzureBlobClient::from_connection_string(connection_string)
    }
}

impl std::fmt::Display for AzureBlobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.endpoint, self.auth)
    }
}

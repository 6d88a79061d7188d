//! Azure Storage connection string parsing

use super::Auth;
use eyre::{Context, Result, eyre};
use std::str::FromStr;
use url::Url;

/// Well-known account of the local storage emulator (Azurite)
pub const DEVELOPMENT_ACCOUNT_NAME: &str = "devstoreaccount1";
/// Well-known key of the local storage emulator, published by Microsoft
pub const DEVELOPMENT_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEVELOPMENT_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// Blob endpoint and credential extracted from a connection string
///
/// Supported forms:
/// - `DefaultEndpointsProtocol=https;AccountName=..;AccountKey=..;EndpointSuffix=..`
/// - `BlobEndpoint=https://..;SharedAccessSignature=sv=..`
/// - `UseDevelopmentStorage=true`
#[derive(Clone, Debug)]
pub struct ConnectionString {
    pub blob_endpoint: Url,
    pub auth: Auth,
}

impl FromStr for ConnectionString {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let mut protocol = None;
        let mut account_name = None;
        let mut account_key = None;
        let mut endpoint_suffix = None;
        let mut blob_endpoint = None;
        let mut sas = None;
        let mut development = false;

        for (index, segment) in s
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .enumerate()
        {
            // Values (keys, signatures) may contain '=' themselves
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| eyre!("Connection string segment {} is not Key=Value", index))?;
            let value = value.trim();

            match key.trim().to_lowercase().as_str() {
                "defaultendpointsprotocol" => protocol = Some(value),
                "accountname" => account_name = Some(value),
                "accountkey" => account_key = Some(value),
                "endpointsuffix" => endpoint_suffix = Some(value),
                "blobendpoint" => blob_endpoint = Some(value),
                "sharedaccesssignature" => sas = Some(value),
                "usedevelopmentstorage" => development = value.eq_ignore_ascii_case("true"),
                other => log::debug!("Ignoring connection string key '{}'", other),
            }
        }

        if development {
            return Ok(Self {
                blob_endpoint: Url::parse(DEVELOPMENT_BLOB_ENDPOINT)?,
                auth: Auth::shared_key(DEVELOPMENT_ACCOUNT_NAME, DEVELOPMENT_ACCOUNT_KEY)?,
            });
        }

        let blob_endpoint = match (blob_endpoint, account_name) {
            (Some(endpoint), _) => Url::parse(endpoint)
                .with_context(|| format!("Invalid BlobEndpoint: {}", endpoint))?,
            (None, Some(account)) => {
                let endpoint = format!(
                    "{}://{}.blob.{}",
                    protocol.unwrap_or("https"),
                    account,
                    endpoint_suffix.unwrap_or("core.windows.net")
                );
                Url::parse(&endpoint)
                    .with_context(|| format!("Invalid blob endpoint: {}", endpoint))?
            }
            (None, None) => eyre::bail!("Connection string has neither BlobEndpoint nor AccountName"),
        };

        let auth = match (account_key, sas) {
            (Some(key), _) => {
                let Some(account) = account_name else {
                    eyre::bail!("Connection string has an AccountKey but no AccountName");
                };
                Auth::shared_key(account, key)?
            }
            (None, Some(token)) => Auth::sas(token),
            (None, None) => {
                eyre::bail!("Connection string has neither AccountKey nor SharedAccessSignature")
            }
        };

        Ok(Self {
            blob_endpoint,
            auth,
        })
    }
}

impl std::fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.blob_endpoint, self.auth)
    }
}

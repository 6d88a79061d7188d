//! Hugging Face datasets-server client
//!
//! Reads leading rows of a dataset split through `GET /rows`, which serves at
//! most [`MAX_PAGE_LENGTH`] rows per request.

use super::{Article, DatasetSource};
use eyre::{Context, Result, eyre};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use url::Url;

/// Largest `length` the rows endpoint accepts
pub const MAX_PAGE_LENGTH: usize = 100;

/// One page of the `/rows` response
#[derive(Debug, Deserialize)]
pub struct RowsPage {
    pub rows: Vec<RowEntry>,
    #[serde(default)]
    pub num_rows_total: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RowEntry {
    pub row_idx: usize,
    pub row: Value,
    #[serde(default)]
    pub truncated_cells: Vec<String>,
}

impl RowEntry {
    fn is_truncated(&self) -> bool {
        !self.truncated_cells.is_empty()
    }
}

/// Client for the datasets-server REST API
///
/// # Example
/// ```no_run
/// use wikipedia_extractor::dataset::{DatasetSource, HubClient, TRAIN_SPLIT};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("https://datasets-server.huggingface.co")?;
/// let hub = HubClient::try_new(url, None)?;
/// let articles = hub
///     .load("wikimedia/wikipedia", "20231101.en", TRAIN_SPLIT, 5)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct HubClient {
    client: Client,
    url: Url,
}

impl HubClient {
    /// Create a client for the datasets-server at `url`
    ///
    /// A `token` is sent as a bearer credential, which gated datasets require.
    pub fn try_new(url: Url, token: Option<&str>) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token).parse()?,
            );
        }
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, url })
    }

    fn rows_url(&self) -> Result<Url> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| eyre!("Invalid datasets-server URL: {}", self.url))?
            .pop_if_empty()
            .push("rows");
        Ok(url)
    }

    /// Fetch `length` rows starting at `offset`
    pub async fn fetch_page(
        &self,
        name: &str,
        subset: &str,
        split: &str,
        offset: usize,
        length: usize,
    ) -> Result<RowsPage> {
        log::debug!(
            "Fetching rows {}..{} of {}/{} ({})",
            offset,
            offset + length,
            name,
            subset,
            split
        );

        let query = [
            ("dataset", name.to_string()),
            ("config", subset.to_string()),
            ("split", split.to_string()),
            ("offset", offset.to_string()),
            ("length", length.to_string()),
        ];
        let response = self
            .client
            .get(self.rows_url()?)
            .query(&query)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eyre::bail!(
                "Failed to fetch rows of {}/{} ({}): {}",
                name,
                subset,
                status,
                body
            );
        }

        response
            .json::<RowsPage>()
            .await
            .with_context(|| format!("Failed to parse rows of {}/{}", name, subset))
    }
}

impl DatasetSource for HubClient {
    async fn load(
        &self,
        name: &str,
        subset: &str,
        split: &str,
        limit: usize,
    ) -> Result<Vec<Article>> {
        collect_pages(limit, |offset, length| {
            self.fetch_page(name, subset, split, offset, length)
        })
        .await
    }
}

/// Read pages front to back until `limit` rows arrive or a short page ends the split
///
/// The server cuts long cells short when a page grows too large, so each
/// truncated row is fetched again on its own. A row that is still truncated
/// then is an error rather than a partial article.
async fn collect_pages<F, Fut>(limit: usize, mut fetch: F) -> Result<Vec<Article>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<RowsPage>>,
{
    let mut articles = Vec::with_capacity(limit.min(MAX_PAGE_LENGTH));

    while articles.len() < limit {
        let offset = articles.len();
        let length = (limit - offset).min(MAX_PAGE_LENGTH);
        let page = fetch(offset, length).await?;
        let received = page.rows.len();

        for entry in page.rows {
            if !entry.is_truncated() {
                articles.push(entry.row);
                continue;
            }

            log::debug!(
                "Row {} truncated ({}), fetching it alone",
                entry.row_idx,
                entry.truncated_cells.join(", ")
            );
            let single = fetch(entry.row_idx, 1).await?;
            match single.rows.into_iter().next() {
                Some(full) if !full.is_truncated() => articles.push(full.row),
                Some(full) => eyre::bail!(
                    "Row {} is too large for the datasets server, cells truncated: {}",
                    entry.row_idx,
                    full.truncated_cells.join(", ")
                ),
                None => eyre::bail!("Row {} disappeared while refetching it", entry.row_idx),
            }
        }

        if received < length {
            match page.num_rows_total {
                Some(total) => log::debug!(
                    "Split exhausted after {} rows ({} in total)",
                    articles.len(),
                    total
                ),
                None => log::debug!("Split exhausted after {} rows", articles.len()),
            }
            break;
        }
    }

    articles.truncate(limit);
    Ok(articles)
}

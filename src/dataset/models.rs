//! Article and metadata records

use chrono::{DateTime, Utc};
use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw dataset record
///
/// Kept as JSON so every field, including ones this crate never reads,
/// survives the trip into blob storage.
pub type Article = Value;

/// Lightweight view of an article, stamped when it was derived
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Extraction time, not the dataset dump time
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Value>,
}

impl Metadata {
    /// Derive metadata from an article object
    ///
    /// Missing `id`, `title` and `url` become empty strings. `categories` is
    /// copied verbatim only when the key exists.
    ///
    /// # Errors
    /// Returns an error if the article is not a JSON object
    pub fn from_article(article: &Article, last_updated: DateTime<Utc>) -> Result<Self> {
        let Some(fields) = article.as_object() else {
            eyre::bail!(
                "Expected an article object, got {}",
                json_type_name(article)
            );
        };

        Ok(Self {
            id: field_text(article, "id").unwrap_or_default(),
            title: field_text(article, "title").unwrap_or_default(),
            url: field_text(article, "url").unwrap_or_default(),
            last_updated,
            categories: fields.get("categories").cloned(),
        })
    }
}

/// Blob name for an article: `<id>-<title>.json`
///
/// Spaces in the title become underscores. A missing id or title falls back
/// to `unknown` / `untitled`, so the name is stable across runs and a
/// re-upload overwrites the previous blob.
pub fn blob_name(article: &Article) -> String {
    let id = field_text(article, "id").unwrap_or_else(|| "unknown".to_string());
    let title = field_text(article, "title").unwrap_or_else(|| "untitled".to_string());
    format!("{}-{}.json", id, title.replace(' ', "_"))
}

/// Render a scalar field as text; null and absent fields yield `None`
fn field_text(article: &Article, key: &str) -> Option<String> {
    match article.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

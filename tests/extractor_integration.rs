//! Integration tests for the data extractor operations
//!
//! A fake dataset stands in for Hugging Face and the in-memory blob store
//! stands in for Azure, so every property is checked without a network.

use chrono::DateTime;
use eyre::Result;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use wikipedia_extractor::{
    Article, DataExtractor, DatasetSource, ExtractorConfig, MemoryBlobStore, blob_name,
};

/// Mock dataset holding two sample Wikipedia articles
#[derive(Default)]
struct SampleDataset {
    calls: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl SampleDataset {
    fn new() -> Self {
        Self::default()
    }
}

impl DatasetSource for SampleDataset {
    async fn load(
        &self,
        name: &str,
        subset: &str,
        split: &str,
        limit: usize,
    ) -> Result<Vec<Article>> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), subset.to_string(), split.to_string()));

        let rows = vec![
            json!({
                "id": "12345",
                "url": "https://en.wikipedia.org/wiki/Sample_Article_1",
                "title": "Sample Article 1",
                "text": "This is the content of sample article 1. It contains some information about a topic.",
            }),
            json!({
                "id": "67890",
                "url": "https://en.wikipedia.org/wiki/Sample_Article_2",
                "title": "Sample Article 2",
                "text": "This is the content of sample article 2. It also contains some information about a different topic.",
            }),
        ];
        Ok(rows.into_iter().take(limit).collect())
    }
}

/// Dataset whose every request fails, like an unknown dataset name
struct MissingDataset;

impl DatasetSource for MissingDataset {
    async fn load(&self, name: &str, _: &str, _: &str, _: usize) -> Result<Vec<Article>> {
        eyre::bail!("Failed to fetch rows of {} (404 Not Found)", name)
    }
}

fn config(connection_string: Option<&str>) -> ExtractorConfig {
    ExtractorConfig {
        dataset_name: "wikimedia/wikipedia".to_string(),
        subset: "20220301.en".to_string(),
        sample_size: 10,
        connection_string: connection_string.map(str::to_string),
        ..ExtractorConfig::default()
    }
}

#[tokio::test]
async fn test_load_wikipedia_subset() -> Result<()> {
    let extractor = DataExtractor::new(config(None), SampleDataset::new(), MemoryBlobStore::new());

    let articles = extractor.load_sample(Some(2)).await?;

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0]["title"], "Sample Article 1");
    assert_eq!(articles[1]["title"], "Sample Article 2");
    Ok(())
}

#[tokio::test]
async fn test_load_requests_train_split() -> Result<()> {
    let dataset = SampleDataset::new();
    let calls = dataset.calls.clone();
    let extractor = DataExtractor::new(config(None), dataset, MemoryBlobStore::new());

    extractor.load_sample(Some(2)).await?;

    assert_eq!(
        *calls.lock().unwrap(),
        vec![(
            "wikimedia/wikipedia".to_string(),
            "20220301.en".to_string(),
            "train".to_string()
        )]
    );
    Ok(())
}

#[tokio::test]
async fn test_load_errors_propagate() {
    let extractor = DataExtractor::new(config(None), MissingDataset, MemoryBlobStore::new());

    let err = extractor.load_sample(Some(2)).await.unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_extract_metadata() -> Result<()> {
    let extractor = DataExtractor::new(config(None), SampleDataset::new(), MemoryBlobStore::new());

    let articles = extractor.load_sample(Some(1)).await?;
    let metadata = extractor.extract_metadata(&articles[0])?;

    assert_eq!(metadata.id, "12345");
    assert_eq!(metadata.title, "Sample Article 1");
    assert_eq!(
        metadata.url,
        "https://en.wikipedia.org/wiki/Sample_Article_1"
    );

    let serialized = serde_json::to_value(&metadata)?;
    let stamp = serialized["last_updated"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    assert!(serialized.get("categories").is_none());
    Ok(())
}

#[tokio::test]
async fn test_save_to_blob_storage() -> Result<()> {
    let store = MemoryBlobStore::new();
    let extractor = DataExtractor::new(
        config(Some("UseDevelopmentStorage=true")),
        SampleDataset::new(),
        store.clone(),
    );

    let articles = extractor.load_sample(Some(1)).await?;
    let success = extractor
        .save_article(&articles[0], Some("container-name"))
        .await;

    assert!(success);
    let names = store.blob_names("container-name");
    assert_eq!(names, vec!["12345-Sample_Article_1.json"]);

    let parsed: Value = store.blob("container-name", &names[0]).unwrap().json()?;
    assert_eq!(parsed["title"], "Sample Article 1");
    assert_eq!(parsed, articles[0]);
    Ok(())
}

#[tokio::test]
async fn test_save_overwrites_same_article() -> Result<()> {
    let store = MemoryBlobStore::new();
    let extractor = DataExtractor::new(
        config(Some("UseDevelopmentStorage=true")),
        SampleDataset::new(),
        store.clone(),
    );

    let mut article = json!({"id": "12345", "title": "Sample Article 1", "text": "v1"});
    assert!(extractor.save_article(&article, None).await);
    article["text"] = json!("v2");
    assert!(extractor.save_article(&article, None).await);

    let names = store.blob_names("wikipedia-raw");
    assert_eq!(names.len(), 1);
    let stored = store.blob("wikipedia-raw", &names[0]).unwrap().json()?;
    assert_eq!(stored["text"], "v2");
    Ok(())
}

#[tokio::test]
async fn test_save_without_credentials_makes_no_connection() {
    let store = MemoryBlobStore::new();
    let extractor = DataExtractor::new(config(None), SampleDataset::new(), store.clone());

    let success = extractor
        .save_article(&json!({"id": "12345"}), Some("container-name"))
        .await;

    assert!(!success);
    assert!(store.connections().is_empty());
    assert!(!store.has_container("container-name"));
}

#[test]
fn test_blob_names() {
    assert_eq!(
        blob_name(&json!({"id": "12345", "title": "Sample Article 1"})),
        "12345-Sample_Article_1.json"
    );
    assert_eq!(blob_name(&json!({})), "unknown-untitled.json");
}

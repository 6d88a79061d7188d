//! NDJSON (Newline Delimited JSON) file operations

use crate::etl::{Extractor, Loader};

use eyre::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Read articles from an NDJSON file, one object per line
pub struct NdjsonReader {
    path: PathBuf,
    limit: Option<usize>,
}

impl NdjsonReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            limit: None,
        }
    }

    /// Only extract the first `limit` records
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Read all lines as JSON values
    pub fn read(&self) -> Result<Vec<Value>> {
        self.read_lines(usize::MAX)
    }

    /// Read at most `count` non-blank lines
    pub fn read_lines(&self, count: usize) -> Result<Vec<Value>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read NDJSON file: {}", self.path.display()))?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(count)
            .enumerate()
            .map(|(index, line)| {
                serde_json::from_str(line).with_context(|| {
                    format!(
                        "Failed to parse record {} of {}",
                        index + 1,
                        self.path.display()
                    )
                })
            })
            .collect()
    }
}

impl Extractor for NdjsonReader {
    type Item = Value;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        match self.limit {
            Some(limit) => self.read_lines(limit),
            None => self.read(),
        }
    }
}

/// Write serializable records to an NDJSON file
///
/// Non-ASCII text is written as-is, not `\u` escaped.
pub struct NdjsonWriter<T = Value> {
    path: PathBuf,
    _phantom: PhantomData<fn(T)>,
}

impl<T: Serialize> NdjsonWriter<T> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _phantom: PhantomData,
        }
    }

    /// Write records as NDJSON, replacing the file
    pub fn write(&self, items: &[T]) -> Result<()> {
        let ndjson = items
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        // Add trailing newline
        let content = if ndjson.is_empty() {
            String::new()
        } else {
            format!("{}\n", ndjson)
        };

        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write NDJSON file: {}", self.path.display()))?;

        Ok(())
    }
}

impl<T: Serialize + Send> Loader for NdjsonWriter<T> {
    type Item = T;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        self.write(&items)?;
        Ok(items.len())
    }
}

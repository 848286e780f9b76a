//! Local knowledge sources: a JSON file on disk or an in-memory (embedded) string.

use std::path::{Path, PathBuf};

use super::KnowledgeSource;
use crate::error::LoadError;

/// Reads the knowledge JSON from a file on every fetch.
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait::async_trait]
impl KnowledgeSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| LoadError::Io {
                source_name: self.name.clone(),
                error,
            })
    }
}

/// Knowledge JSON held in memory, e.g. an `include_str!` asset.
pub struct InlineSource {
    name: String,
    json: String,
}

impl InlineSource {
    pub fn new(name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json: json.into(),
        }
    }
}

#[async_trait::async_trait]
impl KnowledgeSource for InlineSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        Ok(self.json.clone())
    }
}

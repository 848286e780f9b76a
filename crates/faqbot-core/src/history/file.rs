//! JSON lines chat log: one serialized exchange per line, appended.

use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::{ChatExchange, ChatLogSink};
use crate::error::ChatLogError;

pub struct JsonlChatLog {
    path: PathBuf,
}

impl JsonlChatLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl ChatLogSink for JsonlChatLog {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn record(&self, exchange: &ChatExchange) -> Result<(), ChatLogError> {
        let mut line = serde_json::to_vec(exchange)?;
        line.push(b'\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

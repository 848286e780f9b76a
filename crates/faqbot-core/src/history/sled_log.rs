//! Sled-backed chat history (one tree, UUID keys, JSON values).

use sled::{Db, Tree};
use std::path::Path;
use uuid::Uuid;

use super::{ChatExchange, ChatLogSink};
use crate::error::ChatLogError;

const TREE_NAME: &str = "chat_history";

pub struct SledChatLog {
    // Keeps the database open for the lifetime of the tree handle.
    _db: Db,
    tree: Tree,
}

impl SledChatLog {
    /// Opens or creates the history DB at the given path.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, sled::Error> {
        let db = sled::open(path)?;
        let tree = db.open_tree(TREE_NAME)?;
        Ok(Self { _db: db, tree })
    }

    pub fn count(&self) -> usize {
        self.tree.len()
    }

    /// All stored exchanges, oldest first. Undecodable values are skipped.
    pub fn exchanges(&self) -> Result<Vec<ChatExchange>, sled::Error> {
        let mut out = Vec::new();
        for item in self.tree.iter() {
            let (_, v) = item?;
            if let Ok(exchange) = serde_json::from_slice::<ChatExchange>(&v) {
                out.push(exchange);
            }
        }
        out.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(out)
    }
}

#[async_trait::async_trait]
impl ChatLogSink for SledChatLog {
    fn name(&self) -> &str {
        "sled"
    }

    async fn record(&self, exchange: &ChatExchange) -> Result<(), ChatLogError> {
        let key = Uuid::new_v4().to_string();
        let value = serde_json::to_vec(exchange)?;
        let tree = self.tree.clone();
        // insert + flush hit the disk; keep them off the async workers.
        tokio::task::spawn_blocking(move || -> Result<(), ChatLogError> {
            tree.insert(key.as_bytes(), value)?;
            tree.flush()?;
            Ok(())
        })
        .await?
    }
}

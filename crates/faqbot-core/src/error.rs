//! Error types for the faqbot core.

use thiserror::Error;

/// Knowledge source could not be read or parsed.
///
/// Callers going through [`KnowledgeStore`](crate::KnowledgeStore) never see this:
/// the store degrades to an empty knowledge base instead.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("knowledge source {source_name} unreadable: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("knowledge source {source_name} is not a valid record list: {error}")]
    Parse {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },

    #[error("knowledge source {source_name} fetch failed: {reason}")]
    Remote { source_name: String, reason: String },
}

/// A chat log sink failed to persist an exchange.
#[derive(Error, Debug)]
pub enum ChatLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("remote chat log failed: {0}")]
    Remote(String),

    #[error("chat log write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

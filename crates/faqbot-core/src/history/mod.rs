//! Chat history: each answered question is handed to every configured sink.
//!
//! Sinks are side channels. A failing sink is logged and skipped; it never
//! changes the reply the user gets.

mod file;
mod sled_log;

pub use file::JsonlChatLog;
pub use sled_log::SledChatLog;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ChatLogError;

/// One question/reply pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatExchange {
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
    pub user: String,
    pub bot: String,
}

impl ChatExchange {
    /// Creates an exchange stamped with the current time.
    pub fn now(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            user: user.into(),
            bot: bot.into(),
        }
    }
}

/// Destination for chat exchanges.
#[async_trait::async_trait]
pub trait ChatLogSink: Send + Sync {
    /// Sink name for logs.
    fn name(&self) -> &str;

    async fn record(&self, exchange: &ChatExchange) -> Result<(), ChatLogError>;
}

/// Hands `exchange` to every sink in order; failures are logged, not returned.
pub async fn record_exchange(sinks: &[Arc<dyn ChatLogSink>], exchange: &ChatExchange) {
    for sink in sinks {
        if let Err(e) = sink.record(exchange).await {
            tracing::warn!(
                target: "faqbot::history",
                sink = %sink.name(),
                "Failed to save chat exchange: {}",
                e
            );
        }
    }
}

//! Chat log sink that submits each exchange to an external form endpoint.

use faqbot_core::{ChatExchange, ChatLogError, ChatLogSink};
use std::time::Duration;

/// Posts `application/x-www-form-urlencoded` submissions with configurable field names.
pub struct FormChatLog {
    url: String,
    user_field: String,
    bot_field: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl FormChatLog {
    pub fn new(url: impl Into<String>, user_field: impl Into<String>, bot_field: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_field: user_field.into(),
            bot_field: bot_field.into(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Per-submission timeout; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl ChatLogSink for FormChatLog {
    fn name(&self) -> &str {
        "form"
    }

    async fn record(&self, exchange: &ChatExchange) -> Result<(), ChatLogError> {
        let fields = [
            (self.user_field.as_str(), exchange.user.as_str()),
            (self.bot_field.as_str(), exchange.bot.as_str()),
        ];
        let mut req = self.client.post(&self.url).form(&fields);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let res = req
            .send()
            .await
            .map_err(|e| ChatLogError::Remote(e.to_string()))?;
        res.error_for_status()
            .map_err(|e| ChatLogError::Remote(e.to_string()))?;
        Ok(())
    }
}

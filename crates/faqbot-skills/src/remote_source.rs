//! Knowledge source served over HTTP (e.g. a config service or static asset host).

use faqbot_core::{KnowledgeSource, LoadError};
use std::time::Duration;

pub struct RemoteSource {
    url: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch timeout; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn remote_error(&self, reason: impl ToString) -> LoadError {
        LoadError::Remote {
            source_name: self.url.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl KnowledgeSource for RemoteSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        let mut req = self.client.get(&self.url);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let res = req
            .send()
            .await
            .map_err(|e| self.remote_error(e))?;
        let res = res.error_for_status().map_err(|e| self.remote_error(e))?;
        res.text().await.map_err(|e| self.remote_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{hanging, serve};
    use axum::{http::StatusCode, routing::get, Router};
    use faqbot_core::load_knowledge_base;

    #[tokio::test]
    async fn fetches_and_parses_remote_records() {
        let app = Router::new().route(
            "/knowledge.json",
            get(|| async { r#"[{"patterns":["Adresse"],"answer":"Duisburg"}]"# }),
        );
        let base = serve(app).await;
        let source = RemoteSource::new(format!("{}/knowledge.json", base));
        let kb = load_knowledge_base(&source).await.unwrap();
        assert_eq!(kb.entries()[0].answer_text(), "Duisburg");
    }

    #[tokio::test]
    async fn http_error_is_remote_load_error() {
        let app = Router::new().route("/knowledge.json", get(|| async { StatusCode::NOT_FOUND }));
        let base = serve(app).await;
        let source = RemoteSource::new(format!("{}/knowledge.json", base));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Remote { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn unresponsive_host_times_out() {
        let base = serve(hanging()).await;
        let source = RemoteSource::new(format!("{}/knowledge.json", base)).with_timeout(Some(Duration::from_millis(200)));
        let result = tokio::time::timeout(Duration::from_secs(5), source.fetch())
            .await
            .expect("fetch should give up on its own");
        assert!(matches!(result, Err(LoadError::Remote { .. })));
    }
}

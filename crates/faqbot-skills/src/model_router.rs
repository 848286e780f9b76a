//! Model Router: sends the knowledge-constrained prompt to an LLM (mock or live API) and returns generated text.

use faqbot_core::CoreConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::prompt::extract_prompt_answer;

/// Mode for LLM invocation: mock (echoes the knowledge answer) or live (OpenAI-compatible chat completions).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LlmMode {
    #[default]
    Mock,
    Live,
}

impl LlmMode {
    /// "live" (any case) selects the live API; everything else is mock.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("live") {
            LlmMode::Live
        } else {
            LlmMode::Mock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmMode::Mock => "mock",
            LlmMode::Live => "live",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("LLM API key missing (set llm_api_key or HF_API_KEY)")]
    ApiKeyMissing,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Connection settings for the live API.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Whole-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Routes a prompt string to a mock LLM or a live OpenAI-compatible API.
pub struct ModelRouter {
    mode: LlmMode,
    settings: LlmSettings,
    client: reqwest::Client,
}

impl ModelRouter {
    pub fn new(mode: LlmMode, settings: LlmSettings) -> Result<Self, ModelError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { mode, settings, client })
    }

    pub fn from_config(config: &CoreConfig) -> Result<Self, ModelError> {
        Self::new(
            LlmMode::parse(&config.llm_mode),
            LlmSettings {
                base_url: config.llm_base_url.clone(),
                model: config.llm_model.clone(),
                api_key: config.resolved_llm_api_key(),
                timeout: config.llm_timeout(),
            },
        )
    }

    /// Mock router with default settings; never touches the network.
    pub fn mock() -> Self {
        Self {
            mode: LlmMode::Mock,
            settings: LlmSettings {
                base_url: String::new(),
                model: "mock".to_string(),
                api_key: None,
                timeout: Some(Duration::from_secs(30)),
            },
            client: reqwest::Client::new(),
        }
    }

    pub fn mode(&self) -> LlmMode {
        self.mode
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Generates a reply for `prompt`. The text is returned untrimmed; it may be empty
    /// when the API answered without content.
    pub async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        match self.mode {
            LlmMode::Mock => Ok(self.mock_generate(prompt)),
            LlmMode::Live => self.live_generate(prompt).await,
        }
    }

    /// Mock LLM: returns the knowledge answer embedded in the prompt, so mock replies
    /// stay grounded like a well-behaved model would.
    fn mock_generate(&self, prompt: &str) -> String {
        match extract_prompt_answer(prompt) {
            Some(answer) => answer.to_string(),
            None => {
                let preview = prompt
                    .chars()
                    .take(80)
                    .chain(if prompt.chars().count() > 80 { "…" } else { "" }.chars())
                    .collect::<String>();
                format!("[Generated – Mock LLM] {}", preview)
            }
        }
    }

    async fn live_generate(&self, prompt: &str) -> Result<String, ModelError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ModelError::ApiKeyMissing)?;
        let url = format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'));
        let body = ChatCompletionRequest {
            model: &self.settings.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(target: "faqbot::model", url = %url, model = %self.settings.model, "Calling LLM API");
        let res = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = res.json().await?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}

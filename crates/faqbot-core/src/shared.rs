//! Shared configuration used across all faqbot crates.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::matcher::{MatchConfig, DEFAULT_MATCH_THRESHOLD, DEFAULT_STOPWORDS};

/// Env var consulted for the LLM key when `llm_api_key` is not configured.
pub const ENV_HF_API_KEY: &str = "HF_API_KEY";

/// Global application configuration (gateway, matcher, model, chat log). Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Application identity shown by `/api/v1/status`.
    pub app_name: String,
    /// Interface the gateway binds to.
    pub bind_addr: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// JSON knowledge file (array of `{ patterns, answer }` records).
    pub knowledge_path: String,
    /// When set, the knowledge base is fetched from this URL instead of `knowledge_path`.
    pub knowledge_url: Option<String>,
    /// Request timeout for `knowledge_url`. 0 disables it.
    pub knowledge_timeout_secs: u64,
    /// A match is only accepted when its similarity is strictly greater than this.
    pub match_threshold: f64,
    /// Tokens dropped from questions before matching.
    pub stopwords: Vec<String>,
    /// LLM mode ("mock" or "live").
    pub llm_mode: String,
    /// Base URL of an OpenAI-compatible chat completions API.
    pub llm_base_url: String,
    pub llm_model: String,
    /// Bearer token for the LLM API. Falls back to `HF_API_KEY`.
    pub llm_api_key: Option<String>,
    /// Request timeout for the LLM API. 0 disables it.
    pub llm_timeout_secs: u64,
    /// Allowed CORS origins. Empty (or containing "*") means any origin.
    pub cors_origins: Vec<String>,
    pub assistant: AssistantConfig,
    pub chat_log: ChatLogConfig,
}

/// Identity of the assistant as it appears in prompts and the fallback reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub brand: String,
    pub contact_email: String,
    /// Canonical answer for any address or location question.
    pub location: String,
}

/// Chat log side channels. Every configured sink receives each exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatLogConfig {
    /// Append-only JSON lines file.
    pub file: Option<String>,
    /// Sled database directory.
    pub sled_path: Option<String>,
    /// External form endpoint receiving one form-encoded submission per exchange.
    pub form_url: Option<String>,
    pub form_user_field: String,
    pub form_bot_field: String,
    /// Upper bound on how long a reply waits for the chat log. Also the form
    /// request timeout. 0 disables it.
    pub timeout_secs: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "FAQ Bot".to_string(),
            bind_addr: "0.0.0.0".to_string(),
            port: 8001,
            knowledge_path: "api/knowledge.json".to_string(),
            knowledge_url: None,
            knowledge_timeout_secs: 10,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            llm_mode: "mock".to_string(),
            llm_base_url: "https://router.huggingface.co/v1".to_string(),
            llm_model: "google/gemma-2-2b-it:nebius".to_string(),
            llm_api_key: None,
            llm_timeout_secs: 30,
            cors_origins: Vec::new(),
            assistant: AssistantConfig::default(),
            chat_log: ChatLogConfig::default(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            brand: "Labelmonster".to_string(),
            contact_email: "info@labelmonster.eu".to_string(),
            location: "Großenbaumer Allee 98, 47269 Duisburg".to_string(),
        }
    }
}

impl Default for ChatLogConfig {
    fn default() -> Self {
        Self {
            file: None,
            sled_path: None,
            form_url: None,
            form_user_field: "user".to_string(),
            form_bot_field: "bot".to_string(),
            timeout_secs: 5,
        }
    }
}

/// `secs` as a timeout; 0 means none.
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl ChatLogConfig {
    pub fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_secs)
    }
}

impl CoreConfig {
    pub fn llm_timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.llm_timeout_secs)
    }

    pub fn knowledge_timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.knowledge_timeout_secs)
    }

    /// Matcher settings derived from `match_threshold` and `stopwords`.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig::new(self.match_threshold, self.stopwords.iter().cloned())
    }

    /// Configured key, else `HF_API_KEY` from the environment. Empty values count as unset.
    pub fn resolved_llm_api_key(&self) -> Option<String> {
        self.llm_api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(ENV_HF_API_KEY).ok().filter(|k| !k.is_empty()))
    }

    /// Load config from file and environment. Precedence: env `FAQBOT_CONFIG` path > `config/gateway.toml` > defaults.
    /// Environment overrides use the `FAQBOT__` prefix, e.g. `FAQBOT__PORT=9000` or `FAQBOT__ASSISTANT__BRAND=Acme`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("FAQBOT_CONFIG").unwrap_or_else(|_| "config/gateway.toml".to_string());
        let builder = config::Config::builder();

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("FAQBOT")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("stopwords")
                    .with_list_parse_key("cors_origins"),
            )
            .build()?;

        built.try_deserialize()
    }
}

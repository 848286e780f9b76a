//! Chat responder: the single request flow behind the chat endpoint.
//!
//! message → keywords → best knowledge entry → prompt → model → chat log.
//! Without a match the model is not called and the fixed fallback reply is used.

use faqbot_core::{
    record_exchange, ChatExchange, ChatLogConfig, ChatLogSink, CoreConfig, FileSource, JsonlChatLog,
    KnowledgeSource, KnowledgeStore, Matcher, SledChatLog,
};
use std::sync::Arc;
use std::time::Duration;

use crate::form_log::FormChatLog;
use crate::model_router::{ModelError, ModelRouter};
use crate::prompt::{build_prompt, AssistantProfile};
use crate::remote_source::RemoteSource;

/// Reply when the request carried no message.
pub const NO_MESSAGE_REPLY: &str = "Keine Nachricht erhalten.";
/// Reply when the model answered with empty text.
pub const EMPTY_MODEL_REPLY: &str = "Keine Antwort gefunden.";
/// Reply when the model call failed.
pub const MODEL_ERROR_REPLY: &str = "Fehler beim Abrufen der Antwort.";

const DEFAULT_LOG_TIMEOUT: Duration = Duration::from_secs(5);

/// How a reply was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    NoMessage,
    /// No entry cleared the threshold.
    Fallback,
    /// Entry at `entry_index` matched with `score` and the model answered.
    Answered { entry_index: usize, score: f64 },
    /// A match was found but the model call failed.
    ModelFailed { entry_index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    pub outcome: ReplyOutcome,
}

pub struct ChatResponder {
    knowledge: Arc<KnowledgeStore>,
    matcher: Matcher,
    model_router: Arc<ModelRouter>,
    profile: AssistantProfile,
    sinks: Vec<Arc<dyn ChatLogSink>>,
    log_timeout: Option<Duration>,
}

impl ChatResponder {
    pub fn new(
        knowledge: Arc<KnowledgeStore>,
        matcher: Matcher,
        model_router: Arc<ModelRouter>,
        profile: AssistantProfile,
    ) -> Self {
        Self {
            knowledge,
            matcher,
            model_router,
            profile,
            sinks: Vec::new(),
            log_timeout: Some(DEFAULT_LOG_TIMEOUT),
        }
    }

    /// Wires the knowledge source, model router and chat log sinks described by `config`.
    pub fn from_config(config: &CoreConfig) -> Result<Self, ModelError> {
        let knowledge = Arc::new(KnowledgeStore::new(knowledge_source(config)));
        let model_router = Arc::new(ModelRouter::from_config(config)?);
        let responder = Self::new(
            knowledge,
            Matcher::new(config.match_config()),
            model_router,
            AssistantProfile::from(&config.assistant),
        )
        .with_log_timeout(config.chat_log.timeout());
        Ok(chat_log_sinks(&config.chat_log)
            .into_iter()
            .fold(responder, |r, sink| r.with_sink(sink)))
    }

    pub fn with_sink(mut self, sink: Arc<dyn ChatLogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// How long a reply may wait for the chat log; `None` waits for every sink.
    pub fn with_log_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.log_timeout = timeout;
        self
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeStore> {
        &self.knowledge
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn model_router(&self) -> &Arc<ModelRouter> {
        &self.model_router
    }

    pub fn profile(&self) -> &AssistantProfile {
        &self.profile
    }

    /// Answers one chat message. Never fails: every failure maps to a fixed reply.
    pub async fn respond(&self, message: Option<&str>) -> ChatReply {
        let Some(message) = message.filter(|m| !m.is_empty()) else {
            return ChatReply {
                reply: NO_MESSAGE_REPLY.to_string(),
                outcome: ReplyOutcome::NoMessage,
            };
        };

        let kb = self.knowledge.get().await;
        let Some(matched) = self.matcher.find(message, &kb) else {
            tracing::info!(target: "faqbot::chat", "No knowledge entry matched, sending fallback reply");
            let reply = self.profile.fallback_reply();
            self.log_exchange(message, &reply).await;
            return ChatReply {
                reply,
                outcome: ReplyOutcome::Fallback,
            };
        };

        tracing::info!(
            target: "faqbot::chat",
            entry = matched.index,
            score = matched.score,
            keyword = %matched.keyword,
            pattern = %matched.pattern,
            "Knowledge entry matched"
        );
        let prompt = build_prompt(&self.profile, matched.entry, message);

        match self.model_router.generate(&prompt).await {
            Ok(generated) => {
                let trimmed = generated.trim();
                let reply = if trimmed.is_empty() {
                    EMPTY_MODEL_REPLY.to_string()
                } else {
                    trimmed.to_string()
                };
                self.log_exchange(message, &reply).await;
                ChatReply {
                    reply,
                    outcome: ReplyOutcome::Answered {
                        entry_index: matched.index,
                        score: matched.score,
                    },
                }
            }
            Err(e) => {
                tracing::error!(target: "faqbot::chat", mode = self.model_router.mode().as_str(), "LLM API error: {}", e);
                ChatReply {
                    reply: MODEL_ERROR_REPLY.to_string(),
                    outcome: ReplyOutcome::ModelFailed {
                        entry_index: matched.index,
                    },
                }
            }
        }
    }
}

impl ChatResponder {
    async fn log_exchange(&self, user: &str, bot: &str) {
        if self.sinks.is_empty() {
            return;
        }
        let exchange = ChatExchange::now(user, bot);
        let write = record_exchange(&self.sinks, &exchange);
        match self.log_timeout {
            Some(limit) => {
                if tokio::time::timeout(limit, write).await.is_err() {
                    tracing::warn!(
                        target: "faqbot::history",
                        "Chat log did not finish within {:?}, replying without it",
                        limit
                    );
                }
            }
            None => write.await,
        }
    }
}

/// Remote source when `knowledge_url` is set, else the knowledge file.
pub fn knowledge_source(config: &CoreConfig) -> Arc<dyn KnowledgeSource> {
    match config.knowledge_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => Arc::new(RemoteSource::new(url).with_timeout(config.knowledge_timeout())),
        None => Arc::new(FileSource::new(&config.knowledge_path)),
    }
}

/// Sinks for every configured chat log channel. A sled store that cannot be opened is skipped.
pub fn chat_log_sinks(config: &ChatLogConfig) -> Vec<Arc<dyn ChatLogSink>> {
    let mut sinks: Vec<Arc<dyn ChatLogSink>> = Vec::new();
    if let Some(path) = config.file.as_deref().filter(|p| !p.is_empty()) {
        sinks.push(Arc::new(JsonlChatLog::new(path)));
    }
    if let Some(path) = config.sled_path.as_deref().filter(|p| !p.is_empty()) {
        match SledChatLog::open_path(path) {
            Ok(log) => sinks.push(Arc::new(log)),
            Err(e) => tracing::warn!(target: "faqbot::history", "Chat history store at {} not opened: {}", path, e),
        }
    }
    if let Some(url) = config.form_url.as_deref().filter(|u| !u.is_empty()) {
        sinks.push(Arc::new(
            FormChatLog::new(url, config.form_user_field.clone(), config.form_bot_field.clone())
                .with_timeout(config.timeout()),
        ));
    }
    sinks
}

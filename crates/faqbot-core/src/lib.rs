//! faqbot-core: knowledge store, keyword extraction, fuzzy matcher, chat history and shared config.
//!
//! The matcher is pure and synchronous; the only async pieces are the one-time
//! knowledge load and the chat history sinks.

mod error;
mod history;
mod knowledge;
mod matcher;
mod shared;

pub use error::{ChatLogError, LoadError};

pub use shared::{AssistantConfig, ChatLogConfig, CoreConfig, ENV_HF_API_KEY};

pub use knowledge::{
    load_knowledge_base, FileSource, InlineSource, KnowledgeBase, KnowledgeEntry, KnowledgeSource, KnowledgeStore,
};

pub use matcher::{
    best_candidate, extract_keywords, Match, MatchConfig, Matcher, DEFAULT_MATCH_THRESHOLD, DEFAULT_STOPWORDS,
};

pub use history::{record_exchange, ChatExchange, ChatLogSink, JsonlChatLog, SledChatLog};

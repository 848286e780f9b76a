//! Request-side glue around the faqbot core: LLM transport, prompt, remote knowledge,
//! external chat log, and the chat responder that ties them together.

mod form_log;
mod model_router;
mod prompt;
mod remote_source;
mod responder;

#[cfg(test)]
mod test_support;

pub use form_log::FormChatLog;
pub use model_router::{LlmMode, LlmSettings, ModelError, ModelRouter};
pub use prompt::{build_prompt, AssistantProfile};
pub use remote_source::RemoteSource;
pub use responder::{
    chat_log_sinks, knowledge_source, ChatReply, ChatResponder, ReplyOutcome, EMPTY_MODEL_REPLY,
    MODEL_ERROR_REPLY, NO_MESSAGE_REPLY,
};

//! Chat handler: `POST /api/chat` with `{ "message": "..." }`.
//!
//! Always answers `200 { "reply": "..." }`; a missing message, an unmatched
//! question and a failed model call each map to a fixed German reply inside
//! `ChatResponder`. Other methods on the route get `405 Method Not Allowed`.

use axum::{extract::State, http::StatusCode, Json};

use crate::AppState;

/// Chat request from the website widget.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ChatRequest {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct ChatResponse {
    pub(crate) reply: String,
}

/// An unparsable body is treated like a body without a message.
pub(crate) async fn chat(
    State(state): State<AppState>,
    body: Option<Json<ChatRequest>>,
) -> Json<ChatResponse> {
    let message = body.and_then(|Json(req)| req.message);
    tracing::info!(
        target: "faqbot::chat",
        "Chat request received: {} chars",
        message.as_deref().map_or(0, |m| m.chars().count())
    );

    let out = state.responder.respond(message.as_deref()).await;
    tracing::debug!(target: "faqbot::chat", outcome = ?out.outcome, "Chat reply ready");
    Json(ChatResponse { reply: out.reply })
}

pub(crate) async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

//! Axum-based FAQ bot gateway. Config-driven via CoreConfig.

mod handlers;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use faqbot_core::{load_knowledge_base, CoreConfig};
use faqbot_skills::{knowledge_source, ChatResponder};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pre-flight check: config parses, knowledge base loads, port is free.
async fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    let source = knowledge_source(&config);
    print!("Checking knowledge source {}... ", source.name());
    let kb = load_knowledge_base(source.as_ref())
        .await
        .map_err(|e| format!("knowledge base not loadable: {}", e))?;
    println!("OK ({} entries, {} with patterns)", kb.len(), kb.matchable_count());

    let port = config.port;
    print!("Checking port {}... ", port);
    match std::net::TcpListener::bind((config.bind_addr.as_str(), port)) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", port, e));
        }
    }

    println!("\nSUCCESS: ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[faqbot-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(CoreConfig::load()?);
    let responder = Arc::new(ChatResponder::from_config(&config)?);

    // Load eagerly so the first chat request does not pay for it.
    let kb = responder.knowledge().get().await;
    tracing::info!(
        "Knowledge base ready: {} entries from {} (threshold {}, llm mode {})",
        kb.len(),
        responder.knowledge().source_name(),
        responder.matcher().config().threshold,
        responder.model_router().mode().as_str()
    );

    let app = build_app(AppState {
        config: Arc::clone(&config),
        responder,
    });

    let listener = tokio::net::TcpListener::bind((config.bind_addr.as_str(), config.port)).await?;
    tracing::info!("{} listening on {}", config.app_name, listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        }))
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route(
            "/api/chat",
            post(handlers::chat::chat).fallback(handlers::chat::method_not_allowed),
        )
        .route("/api/v1/health", get(health))
        .route("/api/v1/status", get(status))
        .with_state(state)
        .layer(cors)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) responder: Arc<ChatResponder>,
}

/// GET /api/v1/health – liveness check.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/v1/status – app identity, model mode and knowledge base summary.
async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let knowledge = state.responder.knowledge();
    let entries = knowledge.loaded().map(|kb| kb.len());
    Json(serde_json::json!({
        "app_name": state.config.app_name,
        "llm_mode": state.responder.model_router().mode().as_str(),
        "llm_model": state.responder.model_router().model(),
        "knowledge_source": knowledge.source_name(),
        "knowledge_entries": entries,
        "match_threshold": state.responder.matcher().config().threshold,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use faqbot_core::{AssistantConfig, KnowledgeBase, KnowledgeEntry, KnowledgeStore, Matcher};
    use faqbot_skills::{AssistantProfile, ModelRouter};
    use tower::ServiceExt;

    fn test_config() -> CoreConfig {
        CoreConfig {
            app_name: "Test Gateway".to_string(),
            ..CoreConfig::default()
        }
    }

    fn test_state(config: CoreConfig) -> AppState {
        let kb = KnowledgeBase::new(vec![
            KnowledgeEntry::new(["Öffnungszeiten", "Adresse"], "Mo-Fr 9-17 Uhr"),
            KnowledgeEntry::new(["Versand"], "Wir versenden mit DHL."),
        ]);
        let responder = ChatResponder::new(
            Arc::new(KnowledgeStore::preloaded(kb)),
            Matcher::new(config.match_config()),
            Arc::new(ModelRouter::mock()),
            AssistantProfile::from(&AssistantConfig::default()),
        );
        AppState {
            config: Arc::new(config),
            responder: Arc::new(responder),
        }
    }

    async fn post_chat(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_app(test_state(test_config()));
        let req = Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_status_reports_identity_and_knowledge() {
        let app = build_app(test_state(test_config()));
        let req = Request::builder()
            .uri("/api/v1/status")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["app_name"], "Test Gateway");
        assert_eq!(json["llm_mode"], "mock");
        assert_eq!(json["knowledge_entries"], 2);
        assert_eq!(json["match_threshold"], 0.8);
    }

    #[tokio::test]
    async fn test_chat_answers_from_matched_entry() {
        let app = build_app(test_state(test_config()));
        let (status, json) = post_chat(app, r#"{"message":"Wie sind eure Öffnungszeiten?"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reply"], "Mo-Fr 9-17 Uhr");
    }

    #[tokio::test]
    async fn test_chat_without_message() {
        let app = build_app(test_state(test_config()));
        let (status, json) = post_chat(app.clone(), r#"{}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reply"], "Keine Nachricht erhalten.");

        let (_, json) = post_chat(app.clone(), r#"{"message":""}"#).await;
        assert_eq!(json["reply"], "Keine Nachricht erhalten.");

        let (status, json) = post_chat(app, "not json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reply"], "Keine Nachricht erhalten.");
    }

    #[tokio::test]
    async fn test_chat_unmatched_gets_fallback() {
        let app = build_app(test_state(test_config()));
        let (_, json) = post_chat(app, r#"{"message":"und die das"}"#).await;
        let reply = json["reply"].as_str().unwrap();
        assert!(reply.starts_with("Entschuldigung, das habe ich nicht verstanden."));
        assert!(reply.contains("mailto:info@labelmonster.eu"));
    }

    #[tokio::test]
    async fn test_chat_respects_configured_threshold() {
        let config = CoreConfig {
            match_threshold: 1.0,
            ..test_config()
        };
        let app = build_app(test_state(config));
        let (_, json) = post_chat(app, r#"{"message":"Versand"}"#).await;
        assert!(json["reply"].as_str().unwrap().starts_with("Entschuldigung"));
    }

    #[tokio::test]
    async fn test_chat_rejects_other_methods() {
        let app = build_app(test_state(test_config()));
        let req = Request::builder()
            .method("GET")
            .uri("/api/chat")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Method Not Allowed");
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed_origin() {
        let config = CoreConfig {
            cors_origins: vec!["https://www.example.com".to_string()],
            ..test_config()
        };
        let app = build_app(test_state(config));
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/chat")
            .header("origin", "https://www.example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get("access-control-allow-origin").unwrap(),
            "https://www.example.com"
        );
    }

    #[tokio::test]
    async fn test_cors_any_origin_by_default() {
        let app = build_app(test_state(test_config()));
        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("origin", "https://shop.example.org")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message":"Versand"}"#))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.headers().get("access-control-allow-origin").unwrap(), "*");
    }
}

//! Throwaway HTTP servers standing in for the LLM API, form endpoints and knowledge hosts.

use axum::{http::StatusCode, Router};
use std::time::Duration;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub(crate) async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Accepts every request and never answers within a test's lifetime.
pub(crate) fn hanging() -> Router {
    Router::new().fallback(|| async {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        StatusCode::OK
    })
}

//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use paydash_sdk::objects::ErrorBody;
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1/issuer", api::issuer::router())
        .nest("/api/v1/dashboard", api::dashboard::router())
        .fallback(not_found)
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Unknown paths answer with the same JSON error shape as the API routes.
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("not found")))
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{TestApp, read_json};
    use axum::http::StatusCode;
    use paydash_core::testing::{FakeIssuer, FakeWallet};
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_health_and_unknown_route() {
        let app = TestApp::new(FakeWallet::new("0xWallet"), FakeIssuer::new());

        let health = app.get("/health").await;
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(read_json(health).await["status"], "healthy");

        let missing = app.get("/api/v1/nope").await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(missing).await, json!({"error": "not found"}));
    }
}

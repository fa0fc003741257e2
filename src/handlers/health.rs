//! Health check handlers

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
}

/// Health check endpoint; reports degraded when the store is unreachable
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status, store) = match state.store().ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "up"),
        Err(e) => {
            warn!(error = %e, "Health check: store unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
        }
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            store,
        }),
    )
}

/// Health routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

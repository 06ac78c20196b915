//! Liveness check
//!
//! Public; answers without a session. Reports whether the annotation store
//! answers a trivial query and how many sets are in the walk order.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `unavailable` when the store does not answer
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// Sets in the walk order computed at startup
    pub sets: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!("Health check: store unavailable: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            module: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            sets: state.order.len(),
        }),
    )
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

//! Health and readiness endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use trisense_common::{HealthResponse, ReadyResponse};

use crate::lifecycle;
use crate::state::AppState;

/// Build the health router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}

/// GET /health - which models are currently loaded. Never loads anything.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: lifecycle::health(&state.models).await,
    })
}

/// GET /ready - warm the text and meta models and report whether both loaded.
async fn ready(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        ready: lifecycle::readiness(&state.models).await,
    })
}

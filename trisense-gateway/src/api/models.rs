//! Model slot listing.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use trisense_common::SlotReport;

use crate::state::AppState;

/// Build the models router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/models", get(list_models))
}

#[derive(Debug, Serialize)]
struct ModelsResponse {
    models: Vec<SlotReport>,
}

/// GET /api/models - per-slot location, state and load history.
async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.models.reports().await,
    })
}

//! Text analysis endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use trisense_common::{AnalyzeRequest, AnalyzeResponse, SlotName};

use crate::engine::{anxiety_score, InferenceError};
use crate::error::{Error, Result};
use crate::lifecycle::ModelManager;
use crate::state::AppState;

/// Slots an analysis needs loaded.
pub const ANALYZE_SLOTS: [SlotName; 2] = [SlotName::Text, SlotName::Meta];

const MISSING_TEXT: &str = "Missing 'text' in request body";

/// Build the analysis router.
///
/// `/predict` is kept for the web client, which posts there.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/predict", post(analyze))
}

/// POST /api/analyze - score a piece of text.
///
/// The body is parsed as JSON whatever its content type.
async fn analyze(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<AnalyzeResponse>> {
    let request = parse_request(&body)?;
    let response = analyze_text(&state.models, request.text).await?;
    Ok(Json(response))
}

/// Validate the raw body before any model is touched.
pub fn parse_request(body: &[u8]) -> Result<AnalyzeRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::InvalidRequest(MISSING_TEXT.to_string()));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|_| Error::InvalidRequest("Invalid JSON in request body".to_string()))?;

    match value.get("text") {
        Some(Value::String(text)) => Ok(AnalyzeRequest { text: text.clone() }),
        Some(_) => Err(Error::InvalidRequest("'text' must be a string".to_string())),
        None => Err(Error::InvalidRequest(MISSING_TEXT.to_string())),
    }
}

/// Load the required models, classify `text` and aggregate the logits.
pub async fn analyze_text(models: &ModelManager, text: String) -> Result<AnalyzeResponse> {
    models.ensure(&ANALYZE_SLOTS).await?;
    let model = models
        .text()
        .handle()
        .await
        .ok_or_else(|| Error::Internal("text model not cached after load".to_string()))?;

    let response = tokio::task::spawn_blocking(move || -> std::result::Result<_, InferenceError> {
        let logits = model.classify(&text)?;
        let anxiety_score = anxiety_score(&logits)?;
        Ok(AnalyzeResponse {
            logits,
            anxiety_score,
        })
    })
    .await
    .map_err(|e| Error::Internal(e.to_string()))??;

    Ok(response)
}

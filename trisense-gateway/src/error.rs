//! Error types for the request boundary.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::engine::InferenceError;
use crate::lifecycle::ModelLoadError;

/// Every way a request can fail, as seen by the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or incomplete client input.
    #[error("{0}")]
    InvalidRequest(String),

    /// A required model could not be loaded; the client should retry later.
    #[error(transparent)]
    ModelUnavailable(#[from] ModelLoadError),

    /// Anything unanticipated during inference.
    #[error("{0}")]
    Internal(String),
}

impl From<InferenceError> for Error {
    fn from(err: InferenceError) -> Self {
        Error::Internal(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Error::InvalidRequest(message) => {
                tracing::debug!("Rejected request: {}", message);
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            Error::ModelUnavailable(err) => {
                tracing::warn!("Model {} unavailable: {}", err.slot, err.cause);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "error": "Model load failed",
                        "details": err.to_string()
                    }),
                )
            }
            Error::Internal(message) => {
                tracing::error!("Unhandled error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Internal server error",
                        "message": message
                    }),
                )
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let Error::ModelUnavailable(err) = &self {
            response.extensions_mut().insert(err.slot);
        }
        response
    }
}

/// Render a handler panic as a structured 500 response.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    Error::Internal(message).into_response()
}

pub type Result<T> = std::result::Result<T, Error>;

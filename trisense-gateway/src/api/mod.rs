//! HTTP API.

pub mod analyze;
pub mod health;
pub mod models;

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::error::panic_response;
use crate::logging::request_logger;
use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(analyze::router())
        .merge(models::router())
}

/// The full application: routes plus panic recovery, request logging and CORS.
pub fn app(state: Arc<AppState>) -> Router {
    router()
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_logger))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

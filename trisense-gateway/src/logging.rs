//! Request logging.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use trisense_common::SlotName;

/// Middleware that logs every HTTP request at INFO level.
///
/// Responses for an unavailable model also name the slot that failed to load.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        unavailable_slot = unavailable_slot(&response),
        duration_ms = start.elapsed().as_millis() as u64,
        "HTTP request"
    );

    response
}

/// Slot attached by the error layer to a 503 response, or `-`.
fn unavailable_slot(response: &Response) -> &'static str {
    response
        .extensions()
        .get::<SlotName>()
        .map(SlotName::as_str)
        .unwrap_or("-")
}

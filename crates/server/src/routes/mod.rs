//! API route handlers
//!
//! - `health`: Health checks, readiness, metrics and server metadata
//! - `concepts`: Text normalization, concept matching and quiz tagging

pub mod concepts;
pub mod health;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info (GET /, no authentication)
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Jivvy Concept Server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/v1/concepts/normalize",
            "/api/v1/concepts/match",
            "/api/v1/quiz/tag",
            "/api/v1/metadata",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

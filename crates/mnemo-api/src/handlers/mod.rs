//! HTTP request handlers.

pub mod auth;
pub mod notes;

use axum::{response::IntoResponse, Json};

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

//! # mnemo-api
//!
//! HTTP API server for mnemo.
//!
//! Every authenticated route resolves the bearer token to a live user
//! first; the user's id is then threaded into every store and purge
//! operation as the isolation key.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod state;

use axum::{
    http::Request,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

pub use state::AppState;

/// Maximum accepted request body size (base64-encoded file uploads).
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful
/// for log correlation and debugging production incidents.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router with the standard middleware stack.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Identity
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/google", post(handlers::auth::google_login))
        // Knowledge records
        .route("/memory", get(handlers::notes::list_notes))
        .route("/memory/:id", get(handlers::notes::get_note))
        .route("/ingest", post(handlers::notes::ingest))
        .route("/memory/:id/soft", delete(handlers::notes::soft_delete_note))
        .route("/memory/:id/restore", post(handlers::notes::restore_note))
        .route(
            "/memory/:id/permanent",
            delete(handlers::notes::permanent_delete_note),
        )
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

//! API error type and HTTP mapping.

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::error;

use mnemo_core::{Error, PurgeStage};

/// User-facing API error.
///
/// The wire contract: duplicate email and bad credentials are 400s,
/// token problems are 401s, a purge on a note that is absent or not
/// yours is a 403 (existence is never revealed), and a failed cleanup
/// is a 500 that states explicitly that no data was lost.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    CleanupFailed { stage: PurgeStage, reason: String },
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Conflict(msg) => ApiError::BadRequest(msg),
            Error::InvalidCredentials => {
                ApiError::BadRequest("invalid email or password".to_string())
            }
            Error::InvalidToken | Error::TokenExpired => ApiError::Unauthorized(err.to_string()),
            Error::Unauthenticated(_) => {
                // Do not echo which subject failed to resolve
                ApiError::Unauthorized("authentication required".to_string())
            }
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::NoteNotFound(id) => ApiError::NotFound(format!("Note {} not found", id)),
            Error::Forbidden(msg) => ApiError::Forbidden(msg),
            Error::StageFailed { stage, reason } => ApiError::CleanupFailed { stage, reason },
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": msg }),
            ),
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": msg }),
            ),
            ApiError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, serde_json::json!({ "error": msg }))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg })),
            ApiError::CleanupFailed { stage, reason } => {
                // The stage detail is logged, not exposed beyond a summary
                error!(
                    subsystem = "api",
                    stage = %stage,
                    error = %reason,
                    "Cleanup failed; note metadata retained"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({
                        "error": "cleanup failed, data preserved",
                        "stage": stage,
                    }),
                )
            }
            ApiError::Internal(msg) => {
                error!(subsystem = "api", error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": msg }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

//! Error types for mnemo.

use thiserror::Error;

use crate::models::PurgeStage;

/// Result type alias using mnemo's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for mnemo operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource already exists (duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Login rejected: unknown email, passwordless account, or bad password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session token is malformed or its signature does not verify
    #[error("Invalid token")]
    InvalidToken,

    /// Session token signature is valid but the token has lapsed
    #[error("Token expired")]
    TokenExpired,

    /// Token validated but the subject is not a live user
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Note not found (or not owned by the caller)
    #[error("Note not found: {0}")]
    NoteNotFound(uuid::Uuid),

    /// Authenticated but not permitted
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A purge protocol stage failed; metadata is retained
    #[error("Purge stage {stage} failed: {reason}")]
    StageFailed { stage: PurgeStage, reason: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Object storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Vector index operation failed
    #[error("Index error: {0}")]
    Index(String),

    /// Content extraction failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

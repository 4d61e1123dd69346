//! Core traits for mnemo abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Repository for the user collection.
///
/// The email is the natural key: inserts must reject a second user with
/// the same (lowercased) email with `Error::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `Conflict` on a duplicate email.
    async fn insert(&self, user: User) -> Result<User>;

    /// Look up a user by email (lowercased).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by id.
    async fn get(&self, id: Uuid) -> Result<Option<User>>;

    /// Replace an existing user record. Fails with `NotFound` if absent.
    async fn update(&self, user: User) -> Result<User>;
}

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note lifecycle operations.
///
/// Every operation takes the calling subject's id and matches only notes
/// owned by it — this is the isolation enforcement point; no operation
/// bypasses it.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note. Always starts `Active`.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// List the caller's notes, newest first, filtered by lifecycle state.
    async fn list(&self, owner_id: Uuid, filter: NoteFilter) -> Result<Vec<Note>>;

    /// Fetch one owned note in any addressable state.
    async fn fetch(&self, owner_id: Uuid, id: Uuid) -> Result<Note>;

    /// Transition `Active -> SoftDeleted`. Idempotent: soft-deleting an
    /// already soft-deleted note succeeds as a no-op.
    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<()>;

    /// Transition `SoftDeleted -> Active`.
    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<()>;

    /// Remove an owned note from the live collection, returning it.
    ///
    /// This is the metadata stage of the purge protocol; callers other
    /// than the purge coordinator want `soft_delete`.
    async fn remove(&self, owner_id: Uuid, id: Uuid) -> Result<Note>;

    /// Check whether an owned note exists in any addressable state.
    async fn exists(&self, owner_id: Uuid, id: Uuid) -> Result<bool>;
}

// =============================================================================
// VECTOR INDEX COLLABORATOR
// =============================================================================

/// External semantic index over `extracted_text`.
///
/// Treated as a potentially slow, independently-failing network service;
/// callers bound each call with a timeout.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Index (or re-index) the text for a note.
    async fn index(&self, note_id: Uuid, text: &str) -> Result<()>;

    /// Remove the embedding indexed under `note_id`. Removing an id that
    /// was never indexed is a success.
    async fn purge(&self, note_id: Uuid) -> Result<()>;

    /// Whether an embedding exists for `note_id`.
    async fn contains(&self, note_id: Uuid) -> Result<bool>;
}

// =============================================================================
// EXTRACTION COLLABORATOR
// =============================================================================

/// Result of content extraction/summarization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    pub extracted_text: String,
    pub summary: String,
}

/// External extraction/summarization service, consumed through this
/// narrow contract only.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Produce extracted text and a summary for a capture.
    ///
    /// `content` is the inline text for `Text` mode or the submitted URL
    /// for `Url` mode; `file_name` is set for `File` mode.
    async fn extract(
        &self,
        mode: NoteMode,
        title: &str,
        content: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Extraction>;
}

/// Placeholder extraction used when the real collaborator is unavailable.
///
/// Text content passes through verbatim; other modes get placeholder
/// text so the rest of the pipeline stays exercisable.
pub struct StubExtraction;

#[async_trait]
impl ExtractionService for StubExtraction {
    async fn extract(
        &self,
        mode: NoteMode,
        _title: &str,
        content: Option<&str>,
        _file_name: Option<&str>,
    ) -> Result<Extraction> {
        let extracted_text = match mode {
            NoteMode::Text => content
                .map(str::to_string)
                .ok_or_else(|| Error::InvalidInput("text ingestion requires content".into()))?,
            NoteMode::File | NoteMode::Url => format!("Extracted text from {}", mode),
        };
        Ok(Extraction {
            extracted_text,
            summary: format!("AI summary of {}", mode),
        })
    }
}

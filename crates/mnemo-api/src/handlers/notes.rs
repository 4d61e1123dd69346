//! Knowledge record handlers: ingest, list, soft delete, restore,
//! permanent delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use mnemo_core::{CreateNoteRequest, FileRef, Note, NoteFilter, NoteMode, NoteRepository};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// LISTING
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Lifecycle filter: "active" (default), "trash", or "all".
    pub filter: Option<NoteFilter>,
}

#[derive(Debug, Serialize)]
pub struct ListNotesResponse {
    pub notes: Vec<Note>,
    pub total: usize,
}

pub async fn list_notes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = state
        .store
        .notes
        .list(user.id, query.filter.unwrap_or_default())
        .await?;
    let total = notes.len();
    Ok(Json(ListNotesResponse { notes, total }))
}

pub async fn get_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.store.notes.fetch(user.id, id).await?;
    Ok(Json(note))
}

// =============================================================================
// INGESTION
// =============================================================================

/// Base64-encoded file payload submitted with `mode = "file"`.
#[derive(Debug, Deserialize)]
pub struct IngestFile {
    pub name: String,
    pub mime_type: String,
    /// Base64 (standard alphabet) file bytes.
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct IngestBody {
    pub mode: NoteMode,
    pub title: String,
    /// Inline text for `text` mode; the submitted address for `url` mode.
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub file: Option<IngestFile>,
}

pub async fn ingest(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<IngestBody>,
) -> Result<impl IntoResponse, ApiError> {
    // Mode decides which inputs are mandatory and how the source payload
    // is referenced.
    let original_file = match body.mode {
        NoteMode::Text => {
            if body.content.as_deref().map_or(true, str::is_empty) {
                return Err(ApiError::BadRequest(
                    "text ingestion requires content".to_string(),
                ));
            }
            FileRef::inline_text()
        }
        NoteMode::File => {
            let file = body.file.as_ref().ok_or_else(|| {
                ApiError::BadRequest("file ingestion requires a file payload".to_string())
            })?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&file.data)
                .map_err(|e| ApiError::BadRequest(format!("invalid file data: {e}")))?;
            let url = state
                .objects
                .store(Uuid::now_v7(), &file.name, &file.mime_type, &bytes)
                .await?;
            FileRef {
                url,
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            }
        }
        NoteMode::Url => {
            let url = body
                .content
                .clone()
                .filter(|c| !c.is_empty())
                .ok_or_else(|| {
                    ApiError::BadRequest("url ingestion requires the address as content".to_string())
                })?;
            FileRef {
                url,
                name: "source".to_string(),
                mime_type: "text/html".to_string(),
            }
        }
    };

    let extraction = state
        .extraction
        .extract(
            body.mode,
            &body.title,
            body.content.as_deref(),
            body.file.as_ref().map(|f| f.name.as_str()),
        )
        .await?;

    let note = state
        .store
        .notes
        .insert(CreateNoteRequest {
            owner_id: user.id,
            mode: body.mode,
            title: body.title,
            original_file,
            extracted_text: extraction.extracted_text,
            summary: extraction.summary,
            tags: body.tags.unwrap_or_default(),
        })
        .await?;

    // Only extracted_text is indexed
    state.index.index(note.id, &note.extracted_text).await?;

    info!(
        subsystem = "api",
        op = "ingest",
        user_id = %user.id,
        note_id = %note.id,
        mode = %note.mode,
        "Note ingested"
    );
    Ok((StatusCode::CREATED, Json(note)))
}

// =============================================================================
// LIFECYCLE
// =============================================================================

pub async fn soft_delete_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.notes.soft_delete(user.id, id).await?;
    Ok(Json(serde_json::json!({ "status": "moved_to_recycle_bin" })))
}

pub async fn restore_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.notes.restore(user.id, id).await?;
    Ok(Json(serde_json::json!({ "status": "restored" })))
}

pub async fn permanent_delete_note(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.purge.permanent_delete(user.id, id).await?;
    Ok(Json(serde_json::json!({
        "status": "erased_permanently",
        "cleanup_report": report,
    })))
}

//! Core data models for mnemo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// USER TYPES
// =============================================================================

/// How an account authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Email + password held by the Credential Vault
    Local,
    /// OAuth-style external identity provider
    Federated,
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Federated => write!(f, "federated"),
        }
    }
}

/// A registered account.
///
/// Exactly one User exists per unique email; emails are normalized to
/// lowercase at creation. `password_hash` is present only for local
/// accounts and must never reach a wire response — use [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub auth_provider: AuthProvider,
    pub profile_picture_url: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Construct a local (password) account. Starts unverified.
    pub fn new_local(email: &str, name: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: email.trim().to_lowercase(),
            name: name.trim().to_string(),
            password_hash: Some(password_hash),
            auth_provider: AuthProvider::Local,
            profile_picture_url: None,
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    /// Construct a federated account. Verified at creation.
    pub fn new_federated(email: &str, name: &str, picture: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: email.trim().to_lowercase(),
            name: name.trim().to_string(),
            password_hash: None,
            auth_provider: AuthProvider::Federated,
            profile_picture_url: picture,
            is_verified: true,
            created_at: Utc::now(),
        }
    }

    /// The wire-safe projection of this account.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            auth_provider: self.auth_provider,
            profile_picture_url: self.profile_picture_url.clone(),
            is_verified: self.is_verified,
            created_at: self.created_at,
        }
    }
}

/// User projection for API responses. Carries no credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub auth_provider: AuthProvider,
    pub profile_picture_url: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// How a note was captured; determines how `original_file` and
/// `extracted_text` are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteMode {
    Text,
    File,
    Url,
}

impl std::fmt::Display for NoteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::File => write!(f, "file"),
            Self::Url => write!(f, "url"),
        }
    }
}

/// Live lifecycle states of a note.
///
/// Purged is not a state: a purged note is removed from the live
/// collection by the purge protocol and ceases to exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Active,
    SoftDeleted,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::SoftDeleted => write!(f, "soft_deleted"),
        }
    }
}

/// Reference to the captured source payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Empty for pure-text notes.
    pub url: String,
    pub name: String,
    pub mime_type: String,
}

impl FileRef {
    /// FileRef for a note captured as inline text.
    pub fn inline_text() -> Self {
        Self {
            url: String::new(),
            name: "source".to_string(),
            mime_type: "text/plain".to_string(),
        }
    }

    /// Whether the url points at an externally stored payload, as opposed
    /// to being absent or an inline `data:` payload.
    pub fn is_external(&self) -> bool {
        !self.url.is_empty() && !self.url.starts_with("data:")
    }
}

/// A knowledge record. Owned exclusively by its creating user for its
/// entire life; ownership never transfers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub mode: NoteMode,
    pub title: String,
    pub original_file: FileRef,
    /// The only field indexed into the vector index.
    pub extracted_text: String,
    pub summary: String,
    pub tags: Vec<String>,
    /// Populated by an external enrichment step; empty at creation.
    pub entities: Vec<String>,
    pub lifecycle_state: LifecycleState,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a new note.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub owner_id: Uuid,
    pub mode: NoteMode,
    pub title: String,
    pub original_file: FileRef,
    pub extracted_text: String,
    pub summary: String,
    pub tags: Vec<String>,
}

/// Lifecycle filter for note listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteFilter {
    /// Active notes only (default listing)
    #[default]
    Active,
    /// Soft-deleted notes only (recycle bin view)
    Trash,
    /// Both active and soft-deleted
    All,
}

// =============================================================================
// PURGE TYPES
// =============================================================================

/// One unit of the purge protocol, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurgeStage {
    VectorIndex,
    ObjectStorage,
    Metadata,
}

impl std::fmt::Display for PurgeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VectorIndex => write!(f, "vector_index"),
            Self::ObjectStorage => write!(f, "object_storage"),
            Self::Metadata => write!(f, "metadata"),
        }
    }
}

/// Outcome of one completed purge stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageOutcome {
    Purged,
    Skipped,
}

impl std::fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Purged => write!(f, "purged"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Per-stage report returned by a successful permanent delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    pub vector_index: StageOutcome,
    pub object_storage: StageOutcome,
    pub metadata: StageOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&AuthProvider::Local).unwrap(),
            "\"local\""
        );
        assert_eq!(
            serde_json::to_string(&AuthProvider::Federated).unwrap(),
            "\"federated\""
        );
    }

    #[test]
    fn test_new_local_user_starts_unverified() {
        let user = User::new_local("A@X.com", "Alice", "$argon2id$stub".to_string());
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.auth_provider, AuthProvider::Local);
        assert!(!user.is_verified);
        assert!(user.password_hash.is_some());
    }

    #[test]
    fn test_new_federated_user_is_verified() {
        let user = User::new_federated("b@x.com", "Bob", Some("http://pic".to_string()));
        assert_eq!(user.auth_provider, AuthProvider::Federated);
        assert!(user.is_verified);
        assert!(user.password_hash.is_none());
        assert_eq!(user.profile_picture_url.as_deref(), Some("http://pic"));
    }

    #[test]
    fn test_profile_carries_no_credentials() {
        let user = User::new_local("a@x.com", "Alice", "hash".to_string());
        let json = serde_json::to_value(user.profile()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@x.com");
    }

    #[test]
    fn test_lifecycle_state_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&LifecycleState::SoftDeleted).unwrap(),
            "\"soft_deleted\""
        );
        assert_eq!(LifecycleState::default(), LifecycleState::Active);
    }

    #[test]
    fn test_note_mode_roundtrip() {
        for mode in [NoteMode::Text, NoteMode::File, NoteMode::Url] {
            let json = serde_json::to_string(&mode).unwrap();
            let parsed: NoteMode = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, mode);
            assert_eq!(json, format!("\"{}\"", mode));
        }
    }

    #[test]
    fn test_file_ref_inline_text_is_not_external() {
        let file = FileRef::inline_text();
        assert!(file.url.is_empty());
        assert!(!file.is_external());
    }

    #[test]
    fn test_file_ref_data_url_is_not_external() {
        let file = FileRef {
            url: "data:text/plain;base64,aGVsbG8=".to_string(),
            name: "inline".to_string(),
            mime_type: "text/plain".to_string(),
        };
        assert!(!file.is_external());
    }

    #[test]
    fn test_file_ref_http_url_is_external() {
        let file = FileRef {
            url: "https://objects.example/abc".to_string(),
            name: "doc.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
        };
        assert!(file.is_external());
    }

    #[test]
    fn test_purge_stage_display_matches_serde() {
        for stage in [
            PurgeStage::VectorIndex,
            PurgeStage::ObjectStorage,
            PurgeStage::Metadata,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage));
        }
    }

    #[test]
    fn test_cleanup_report_serialization() {
        let report = CleanupReport {
            vector_index: StageOutcome::Purged,
            object_storage: StageOutcome::Skipped,
            metadata: StageOutcome::Purged,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["vector_index"], "purged");
        assert_eq!(json["object_storage"], "skipped");
        assert_eq!(json["metadata"], "purged");
    }

    #[test]
    fn test_note_filter_default_is_active() {
        assert_eq!(NoteFilter::default(), NoteFilter::Active);
    }
}

//! Note repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use mnemo_core::{
    merge_tags, CreateNoteRequest, Error, LifecycleState, Note, NoteFilter, NoteRepository, Result,
};

/// In-memory implementation of [`NoteRepository`].
///
/// Every lookup matches on `(owner_id, id)` together, so an existing
/// note owned by someone else is indistinguishable from a missing one.
pub struct MemNoteRepository {
    inner: RwLock<HashMap<Uuid, Note>>,
}

impl MemNoteRepository {
    /// Create an empty note repository.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Total number of live notes across all owners.
    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

impl Default for MemNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filter(note: &Note, filter: NoteFilter) -> bool {
    match filter {
        NoteFilter::Active => note.lifecycle_state == LifecycleState::Active,
        NoteFilter::Trash => note.lifecycle_state == LifecycleState::SoftDeleted,
        NoteFilter::All => true,
    }
}

#[async_trait]
impl NoteRepository for MemNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let note = Note {
            id: Uuid::now_v7(),
            owner_id: req.owner_id,
            mode: req.mode,
            title: req.title,
            original_file: req.original_file,
            tags: merge_tags(&req.tags, &req.extracted_text),
            extracted_text: req.extracted_text,
            summary: req.summary,
            entities: Vec::new(),
            lifecycle_state: LifecycleState::Active,
            created_at: Utc::now(),
        };
        self.inner.write().await.insert(note.id, note.clone());
        Ok(note)
    }

    async fn list(&self, owner_id: Uuid, filter: NoteFilter) -> Result<Vec<Note>> {
        let notes = self.inner.read().await;
        let mut owned: Vec<Note> = notes
            .values()
            .filter(|n| n.owner_id == owner_id && matches_filter(n, filter))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn fetch(&self, owner_id: Uuid, id: Uuid) -> Result<Note> {
        let notes = self.inner.read().await;
        notes
            .get(&id)
            .filter(|n| n.owner_id == owner_id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<()> {
        let mut notes = self.inner.write().await;
        match notes.get_mut(&id).filter(|n| n.owner_id == owner_id) {
            Some(note) => {
                // Idempotent: already soft-deleted is a no-op success
                note.lifecycle_state = LifecycleState::SoftDeleted;
                Ok(())
            }
            None => Err(Error::NoteNotFound(id)),
        }
    }

    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<()> {
        let mut notes = self.inner.write().await;
        match notes.get_mut(&id).filter(|n| n.owner_id == owner_id) {
            Some(note) => {
                note.lifecycle_state = LifecycleState::Active;
                Ok(())
            }
            None => Err(Error::NoteNotFound(id)),
        }
    }

    async fn remove(&self, owner_id: Uuid, id: Uuid) -> Result<Note> {
        let mut notes = self.inner.write().await;
        if notes.get(&id).is_some_and(|n| n.owner_id == owner_id) {
            return notes.remove(&id).ok_or(Error::NoteNotFound(id));
        }
        Err(Error::NoteNotFound(id))
    }

    async fn exists(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let notes = self.inner.read().await;
        Ok(notes.get(&id).is_some_and(|n| n.owner_id == owner_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::{FileRef, NoteMode};

    fn text_note(owner_id: Uuid, title: &str, content: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            owner_id,
            mode: NoteMode::Text,
            title: title.to_string(),
            original_file: FileRef::inline_text(),
            extracted_text: content.to_string(),
            summary: "AI summary of text".to_string(),
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_starts_active_with_empty_entities() {
        let repo = MemNoteRepository::new();
        let owner = Uuid::now_v7();
        let note = repo.insert(text_note(owner, "T", "hello")).await.unwrap();
        assert_eq!(note.owner_id, owner);
        assert_eq!(note.lifecycle_state, LifecycleState::Active);
        assert_eq!(note.extracted_text, "hello");
        assert!(note.entities.is_empty());
    }

    #[tokio::test]
    async fn test_insert_merges_inline_hashtags() {
        let repo = MemNoteRepository::new();
        let owner = Uuid::now_v7();
        let mut req = text_note(owner, "T", "learning #rust today");
        req.tags = vec!["Systems".to_string()];
        let note = repo.insert(req).await.unwrap();
        assert_eq!(note.tags, vec!["rust".to_string(), "systems".to_string()]);
    }

    #[tokio::test]
    async fn test_list_never_returns_other_owners_notes() {
        let repo = MemNoteRepository::new();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        for i in 0..3 {
            repo.insert(text_note(alice, &format!("a{i}"), "x")).await.unwrap();
        }
        for i in 0..5 {
            repo.insert(text_note(bob, &format!("b{i}"), "y")).await.unwrap();
        }

        let alice_notes = repo.list(alice, NoteFilter::All).await.unwrap();
        assert_eq!(alice_notes.len(), 3);
        assert!(alice_notes.iter().all(|n| n.owner_id == alice));

        // Isolation holds for zero notes too
        let nobody = repo.list(Uuid::now_v7(), NoteFilter::All).await.unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = MemNoteRepository::new();
        let owner = Uuid::now_v7();
        repo.insert(text_note(owner, "first", "x")).await.unwrap();
        repo.insert(text_note(owner, "second", "x")).await.unwrap();
        let notes = repo.list(owner, NoteFilter::Active).await.unwrap();
        assert_eq!(notes[0].title, "second");
        assert_eq!(notes[1].title, "first");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_active_listing() {
        let repo = MemNoteRepository::new();
        let owner = Uuid::now_v7();
        let note = repo.insert(text_note(owner, "T", "x")).await.unwrap();

        repo.soft_delete(owner, note.id).await.unwrap();
        assert!(repo.list(owner, NoteFilter::Active).await.unwrap().is_empty());
        assert_eq!(repo.list(owner, NoteFilter::Trash).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_soft_delete_is_idempotent() {
        let repo = MemNoteRepository::new();
        let owner = Uuid::now_v7();
        let note = repo.insert(text_note(owner, "T", "x")).await.unwrap();

        repo.soft_delete(owner, note.id).await.unwrap();
        repo.soft_delete(owner, note.id).await.unwrap();
        assert_eq!(
            repo.fetch(owner, note.id).await.unwrap().lifecycle_state,
            LifecycleState::SoftDeleted
        );
    }

    #[tokio::test]
    async fn test_restore_returns_note_to_active() {
        let repo = MemNoteRepository::new();
        let owner = Uuid::now_v7();
        let note = repo.insert(text_note(owner, "T", "x")).await.unwrap();

        repo.soft_delete(owner, note.id).await.unwrap();
        repo.restore(owner, note.id).await.unwrap();
        let listed = repo.list(owner, NoteFilter::Active).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].lifecycle_state, LifecycleState::Active);
    }

    #[tokio::test]
    async fn test_mutations_on_unowned_note_are_not_found() {
        let repo = MemNoteRepository::new();
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        let note = repo.insert(text_note(owner, "T", "x")).await.unwrap();

        for result in [
            repo.soft_delete(stranger, note.id).await,
            repo.restore(stranger, note.id).await,
            repo.remove(stranger, note.id).await.map(|_| ()),
        ] {
            match result {
                Err(Error::NoteNotFound(id)) => assert_eq!(id, note.id),
                other => panic!("Expected NoteNotFound, got {other:?}"),
            }
        }
        // Still present for the real owner
        assert!(repo.exists(owner, note.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_deletes_from_live_collection() {
        let repo = MemNoteRepository::new();
        let owner = Uuid::now_v7();
        let note = repo.insert(text_note(owner, "T", "x")).await.unwrap();

        let removed = repo.remove(owner, note.id).await.unwrap();
        assert_eq!(removed.id, note.id);
        assert!(!repo.exists(owner, note.id).await.unwrap());
        assert_eq!(repo.count().await, 0);

        // A second remove observes "already gone"
        match repo.remove(owner, note.id).await {
            Err(Error::NoteNotFound(_)) => {}
            other => panic!("Expected NoteNotFound, got {other:?}"),
        }
    }
}

//! In-memory vector index implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use mnemo_core::{Result, VectorIndex};

/// In-memory implementation of [`VectorIndex`].
///
/// Stores the indexed text per note id. Purging an id that was never
/// indexed is a success, so ingest paths that skipped indexing do not
/// poison a later purge.
pub struct MemoryVectorIndex {
    entries: RwLock<HashMap<Uuid, String>>,
}

impl MemoryVectorIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of indexed notes.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the index holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// The text indexed for a note, if any.
    pub async fn indexed_text(&self, note_id: Uuid) -> Option<String> {
        self.entries.read().await.get(&note_id).cloned()
    }
}

impl Default for MemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn index(&self, note_id: Uuid, text: &str) -> Result<()> {
        debug!(
            subsystem = "index",
            op = "index",
            note_id = %note_id,
            text_len = text.len(),
            "Indexing note text"
        );
        self.entries.write().await.insert(note_id, text.to_string());
        Ok(())
    }

    async fn purge(&self, note_id: Uuid) -> Result<()> {
        self.entries.write().await.remove(&note_id);
        Ok(())
    }

    async fn contains(&self, note_id: Uuid) -> Result<bool> {
        Ok(self.entries.read().await.contains_key(&note_id))
    }
}

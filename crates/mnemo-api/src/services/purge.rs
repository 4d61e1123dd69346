//! Resource purge coordinator.
//!
//! Executes the permanent-delete protocol across the vector index,
//! object storage, and the note store, in strict dependency order:
//!
//! 1. vector index — a dangling vector over deleted metadata would
//!    surface ghost search results, so it goes first
//! 2. object storage — only for payloads this deployment stores
//! 3. metadata — last, the cheapest and most reliable stage
//!
//! Each stage runs only if the prior stage succeeded. On any failure the
//! protocol aborts with no rollback: already-purged external resources
//! stay purged, and the note's metadata stays present and addressable —
//! fail closed toward data retention. The caller either gets a full
//! [`CleanupReport`] or an error guaranteeing the metadata survived.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use mnemo_core::{
    CleanupReport, Error, NoteRepository, PurgeStage, Result, StageOutcome, VectorIndex,
};
use mnemo_store::ObjectStorage;

/// Default per-stage timeout in seconds for the external collaborators.
pub const DEFAULT_STAGE_TIMEOUT_SECS: u64 = 30;

/// Purge protocol configuration.
#[derive(Debug, Clone)]
pub struct PurgeConfig {
    /// Upper bound per stage; exceeding it fails the stage.
    pub stage_timeout: Duration,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            stage_timeout: Duration::from_secs(DEFAULT_STAGE_TIMEOUT_SECS),
        }
    }
}

impl PurgeConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-stage timeout.
    pub fn stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }
}

/// Coordinates the dependency-ordered multi-store purge protocol.
pub struct PurgeCoordinator {
    notes: Arc<dyn NoteRepository>,
    index: Arc<dyn VectorIndex>,
    objects: Arc<dyn ObjectStorage>,
    config: PurgeConfig,
    /// Per-note locks: concurrent purges of the same id serialize, so
    /// the loser observes "already gone" rather than racing the stages.
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl PurgeCoordinator {
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        index: Arc<dyn VectorIndex>,
        objects: Arc<dyn ObjectStorage>,
        config: PurgeConfig,
    ) -> Self {
        Self {
            notes,
            index,
            objects,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Permanently delete an owned note across all backing stores.
    ///
    /// Precondition: a note with this id, owned by `owner_id`, exists in
    /// an addressable state — otherwise `Forbidden`, deliberately not
    /// distinguishing "not found" from "not yours".
    ///
    /// Once stage 1 begins the protocol runs to completion or first
    /// failure; there is no caller-visible cancellation.
    pub async fn permanent_delete(&self, owner_id: Uuid, note_id: Uuid) -> Result<CleanupReport> {
        let lock = self.note_lock(note_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.run_protocol(owner_id, note_id).await
        };
        drop(lock);
        self.release_lock(note_id).await;
        result
    }

    async fn run_protocol(&self, owner_id: Uuid, note_id: Uuid) -> Result<CleanupReport> {
        let start = Instant::now();

        let note = match self.notes.fetch(owner_id, note_id).await {
            Ok(note) => note,
            Err(Error::NoteNotFound(_)) => {
                return Err(Error::Forbidden(
                    "note does not exist or is not yours".to_string(),
                ))
            }
            Err(e) => return Err(e),
        };

        // Stage 1: vector index
        self.run_stage(PurgeStage::VectorIndex, note_id, self.index.purge(note_id))
            .await?;

        // Stage 2: object storage, skipped when there is no externally
        // stored payload of ours behind the url
        let object_storage = if note.original_file.is_external()
            && self.objects.owns(&note.original_file.url)
        {
            self.run_stage(
                PurgeStage::ObjectStorage,
                note_id,
                self.objects.delete(&note.original_file.url),
            )
            .await?;
            StageOutcome::Purged
        } else {
            StageOutcome::Skipped
        };

        // Stage 3: metadata
        self.run_stage(
            PurgeStage::Metadata,
            note_id,
            self.notes.remove(owner_id, note_id),
        )
        .await?;

        info!(
            subsystem = "purge",
            component = "coordinator",
            op = "permanent_delete",
            user_id = %owner_id,
            note_id = %note_id,
            object_storage = %object_storage,
            duration_ms = start.elapsed().as_millis() as u64,
            "Note purged across all stores"
        );
        Ok(CleanupReport {
            vector_index: StageOutcome::Purged,
            object_storage,
            metadata: StageOutcome::Purged,
        })
    }

    /// Run one stage under the configured timeout. A timeout is a stage
    /// failure like any other, triggering the abort/retain policy.
    async fn run_stage<T>(
        &self,
        stage: PurgeStage,
        note_id: Uuid,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.config.stage_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!(
                    subsystem = "purge",
                    component = "coordinator",
                    stage = %stage,
                    note_id = %note_id,
                    error = %e,
                    "Purge stage failed; metadata retained"
                );
                Err(Error::StageFailed {
                    stage,
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                error!(
                    subsystem = "purge",
                    component = "coordinator",
                    stage = %stage,
                    note_id = %note_id,
                    timeout_ms = self.config.stage_timeout.as_millis() as u64,
                    "Purge stage timed out; metadata retained"
                );
                Err(Error::StageFailed {
                    stage,
                    reason: format!("timed out after {:?}", self.config.stage_timeout),
                })
            }
        }
    }

    async fn note_lock(&self, note_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(note_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry once no other purge of this id holds it.
    async fn release_lock(&self, note_id: Uuid) {
        let mut locks = self.locks.lock().await;
        if let Some(lock) = locks.get(&note_id) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(&note_id);
            }
        }
    }
}

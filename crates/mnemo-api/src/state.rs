//! Application state shared across handlers.

use std::sync::Arc;

use mnemo_auth::IdentityManager;
use mnemo_core::{ExtractionService, NoteRepository, VectorIndex};
use mnemo_store::{ObjectStorage, Store};

use crate::services::purge::{PurgeConfig, PurgeCoordinator};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// User and note collections.
    pub store: Store,
    /// Signup/login/token resolution.
    pub identity: Arc<IdentityManager>,
    /// Extraction/summarization collaborator.
    pub extraction: Arc<dyn ExtractionService>,
    /// Object storage collaborator.
    pub objects: Arc<dyn ObjectStorage>,
    /// Vector index collaborator.
    pub index: Arc<dyn VectorIndex>,
    /// Multi-store purge protocol coordinator.
    pub purge: Arc<PurgeCoordinator>,
}

impl AppState {
    /// Wire up application state, building the purge coordinator from
    /// the store and the two external collaborators.
    pub fn new(
        store: Store,
        identity: Arc<IdentityManager>,
        extraction: Arc<dyn ExtractionService>,
        objects: Arc<dyn ObjectStorage>,
        index: Arc<dyn VectorIndex>,
        purge_config: PurgeConfig,
    ) -> Self {
        let notes: Arc<dyn NoteRepository> = store.notes.clone();
        let purge = Arc::new(PurgeCoordinator::new(
            notes,
            index.clone(),
            objects.clone(),
            purge_config,
        ));
        Self {
            store,
            identity,
            extraction,
            objects,
            index,
            purge,
        }
    }
}

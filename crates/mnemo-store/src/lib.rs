//! # mnemo-store
//!
//! Storage layer for mnemo.
//!
//! This crate provides:
//! - In-memory repository implementations for users and notes behind the
//!   `mnemo-core` repository traits
//! - The object storage collaborator: trait, memory and filesystem
//!   backends, and a failure-injecting mock for tests
//!
//! Each collection is guarded by a single `RwLock` scope: reads run
//! concurrently, mutations serialize, and read-modify-write sequences
//! (soft delete, purge removal) are atomic with respect to concurrent
//! mutations of the same collection.

pub mod mock;
pub mod notes;
pub mod object_storage;
pub mod users;

// Re-export core types
pub use mnemo_core::*;

pub use mock::MockObjectStorage;
pub use notes::MemNoteRepository;
pub use object_storage::{FilesystemObjectStorage, MemoryObjectStorage, ObjectStorage};
pub use users::MemUserRepository;

use std::sync::Arc;

/// Combined store context with all repositories.
#[derive(Clone)]
pub struct Store {
    /// User collection.
    pub users: Arc<MemUserRepository>,
    /// Note collection.
    pub notes: Arc<MemNoteRepository>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            users: Arc::new(MemUserRepository::new()),
            notes: Arc::new(MemNoteRepository::new()),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

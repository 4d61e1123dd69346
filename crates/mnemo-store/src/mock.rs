//! Mock object storage for deterministic testing.
//!
//! Wraps the memory backend with induced failures, optional latency, and
//! a call log, so purge-protocol tests can force a storage stage to fail
//! or stall without a real collaborator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use mnemo_core::{Error, Result};

use crate::object_storage::{MemoryObjectStorage, ObjectStorage};

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockStorageCall {
    pub operation: String,
    pub url: String,
}

/// Failure-injecting [`ObjectStorage`] for tests.
pub struct MockObjectStorage {
    inner: MemoryObjectStorage,
    fail_deletes: AtomicBool,
    delete_delay: Mutex<Option<Duration>>,
    calls: Arc<Mutex<Vec<MockStorageCall>>>,
}

impl MockObjectStorage {
    /// Create a mock with no induced failures.
    pub fn new() -> Self {
        Self {
            inner: MemoryObjectStorage::default(),
            fail_deletes: AtomicBool::new(false),
            delete_delay: Mutex::new(None),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every subsequent delete fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent delete sleep before completing.
    pub fn set_delete_delay(&self, delay: Option<Duration>) {
        *self.delete_delay.lock().expect("mock lock poisoned") = delay;
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<MockStorageCall> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }

    fn record(&self, operation: &str, url: &str) {
        self.calls.lock().expect("mock lock poisoned").push(MockStorageCall {
            operation: operation.to_string(),
            url: url.to_string(),
        });
    }
}

impl Default for MockObjectStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn store(
        &self,
        note_id: Uuid,
        name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<String> {
        let url = self.inner.store(note_id, name, mime_type, data).await?;
        self.record("store", &url);
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.record("delete", url);
        let delay = *self.delete_delay.lock().expect("mock lock poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::Storage("induced delete failure".to_string()));
        }
        self.inner.delete(url).await
    }

    async fn exists(&self, url: &str) -> Result<bool> {
        self.inner.exists(url).await
    }

    fn owns(&self, url: &str) -> bool {
        self.inner.owns(url)
    }
}

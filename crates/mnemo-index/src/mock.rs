//! Mock vector index for deterministic testing.
//!
//! Wraps the memory index with induced failures, optional latency, and a
//! call log, mirroring the storage mock, so tests can force the first
//! purge stage to fail or stall.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use mnemo_core::{Error, Result, VectorIndex};

use crate::memory::MemoryVectorIndex;

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockIndexCall {
    pub operation: String,
    pub note_id: Uuid,
}

/// Failure-injecting [`VectorIndex`] for tests.
pub struct MockVectorIndex {
    inner: MemoryVectorIndex,
    fail_purges: AtomicBool,
    purge_delay: Mutex<Option<Duration>>,
    calls: Arc<Mutex<Vec<MockIndexCall>>>,
}

impl MockVectorIndex {
    /// Create a mock with no induced failures.
    pub fn new() -> Self {
        Self {
            inner: MemoryVectorIndex::new(),
            fail_purges: AtomicBool::new(false),
            purge_delay: Mutex::new(None),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every subsequent purge fail.
    pub fn fail_purges(&self, fail: bool) {
        self.fail_purges.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent purge sleep before completing.
    pub fn set_purge_delay(&self, delay: Option<Duration>) {
        *self.purge_delay.lock().expect("mock lock poisoned") = delay;
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<MockIndexCall> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }

    fn record(&self, operation: &str, note_id: Uuid) {
        self.calls.lock().expect("mock lock poisoned").push(MockIndexCall {
            operation: operation.to_string(),
            note_id,
        });
    }
}

impl Default for MockVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    async fn index(&self, note_id: Uuid, text: &str) -> Result<()> {
        self.record("index", note_id);
        self.inner.index(note_id, text).await
    }

    async fn purge(&self, note_id: Uuid) -> Result<()> {
        self.record("purge", note_id);
        let delay = *self.purge_delay.lock().expect("mock lock poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_purges.load(Ordering::SeqCst) {
            return Err(Error::Index("induced purge failure".to_string()));
        }
        self.inner.purge(note_id).await
    }

    async fn contains(&self, note_id: Uuid) -> Result<bool> {
        self.inner.contains(note_id).await
    }
}

//! Object storage collaborator: trait plus memory and filesystem backends.
//!
//! Notes captured as files keep their binary payload here; the metadata
//! record carries only the returned url. The purge protocol deletes
//! through this interface before touching metadata, and skips urls this
//! store did not issue (submitted web urls, inline `data:` payloads).

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use mnemo_core::{Error, Result};

/// External binary payload store.
///
/// Treated as a potentially slow, independently-failing network service;
/// callers bound each call with a timeout.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a payload for a note, returning its addressable url.
    async fn store(&self, note_id: Uuid, name: &str, mime_type: &str, data: &[u8])
        -> Result<String>;

    /// Delete the payload behind a url this store issued. Deleting an
    /// already-absent payload is a success.
    async fn delete(&self, url: &str) -> Result<()>;

    /// Whether a payload exists behind the url.
    async fn exists(&self, url: &str) -> Result<bool>;

    /// Whether this store issued the url. Foreign urls are not ours to
    /// delete.
    fn owns(&self, url: &str) -> bool;
}

// =============================================================================
// MEMORY BACKEND
// =============================================================================

#[derive(Debug, Clone)]
struct StoredObject {
    name: String,
    mime_type: String,
    data: Vec<u8>,
}

/// In-memory object storage (the default reference backend).
pub struct MemoryObjectStorage {
    base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryObjectStorage {
    /// Create a memory backend issuing urls under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored payloads.
    pub async fn count(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Size in bytes of the payload behind a url, if present.
    pub async fn size_of(&self, url: &str) -> Option<usize> {
        self.objects.read().await.get(url).map(|o| o.data.len())
    }

    /// `(name, mime_type)` recorded for the payload behind a url.
    pub async fn metadata_of(&self, url: &str) -> Option<(String, String)> {
        self.objects
            .read()
            .await
            .get(url)
            .map(|o| (o.name.clone(), o.mime_type.clone()))
    }
}

impl Default for MemoryObjectStorage {
    fn default() -> Self {
        Self::new("memory://objects/")
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn store(
        &self,
        note_id: Uuid,
        name: &str,
        mime_type: &str,
        data: &[u8],
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, note_id);
        debug!(
            subsystem = "store",
            component = "object_storage",
            note_id = %note_id,
            size = data.len(),
            "Storing payload"
        );
        self.objects.write().await.insert(
            url.clone(),
            StoredObject {
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                data: data.to_vec(),
            },
        );
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<()> {
        if !self.owns(url) {
            return Err(Error::Storage(format!("url not issued by this store: {url}")));
        }
        self.objects.write().await.remove(url);
        Ok(())
    }

    async fn exists(&self, url: &str) -> Result<bool> {
        Ok(self.objects.read().await.contains_key(url))
    }

    fn owns(&self, url: &str) -> bool {
        url.starts_with(&self.base_url)
    }
}

// =============================================================================
// FILESYSTEM BACKEND
// =============================================================================

/// Filesystem object storage.
///
/// Stores payloads in a directory hierarchy derived from the note id.
/// Path format: `{base_path}/blobs/{first-2-hex}/{next-2-hex}/{uuid}.bin`
pub struct FilesystemObjectStorage {
    base_path: PathBuf,
}

impl FilesystemObjectStorage {
    /// Create a filesystem backend rooted at the given directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn blob_path(&self, note_id: Uuid) -> PathBuf {
        let hex = note_id.simple().to_string();
        self.base_path
            .join("blobs")
            .join(&hex[0..2])
            .join(&hex[2..4])
            .join(format!("{hex}.bin"))
    }

    fn url_for(&self, note_id: Uuid) -> String {
        format!("file://{}", self.blob_path(note_id).display())
    }

    fn path_from_url(&self, url: &str) -> Result<PathBuf> {
        let path = url
            .strip_prefix("file://")
            .ok_or_else(|| Error::Storage(format!("url not issued by this store: {url}")))?;
        let path = PathBuf::from(path);
        if !path.starts_with(&self.base_path) {
            return Err(Error::Storage(format!("url outside storage root: {url}")));
        }
        Ok(path)
    }

    /// Validate that the backend can write, read, and delete files.
    ///
    /// Performs a full round-trip at startup to catch filesystem issues
    /// (permissions, missing directories) early.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let test_dir = self.base_path.join("blobs/.health-check");
        let test_file = test_dir.join("test.bin");

        fs::create_dir_all(&test_dir)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", test_dir, e))?;

        let data = b"storage-health-check";
        fs::write(&test_file, data)
            .await
            .map_err(|e| format!("write({:?}): {}", test_file, e))?;

        let read_data = fs::read(&test_file)
            .await
            .map_err(|e| format!("read({:?}): {}", test_file, e))?;
        if read_data != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&test_file)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", test_file, e))?;
        let _ = fs::remove_dir(&test_dir).await;

        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for FilesystemObjectStorage {
    async fn store(
        &self,
        note_id: Uuid,
        _name: &str,
        _mime_type: &str,
        data: &[u8],
    ) -> Result<String> {
        let path = self.blob_path(note_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        debug!(
            subsystem = "store",
            component = "object_storage",
            note_id = %note_id,
            path = %path.display(),
            size = data.len(),
            "Stored payload"
        );
        Ok(self.url_for(note_id))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let path = self.path_from_url(url)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone is a success
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, url: &str) -> Result<bool> {
        let path = self.path_from_url(url)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn owns(&self, url: &str) -> bool {
        url.strip_prefix("file://")
            .map(|p| PathBuf::from(p).starts_with(&self.base_path))
            .unwrap_or(false)
    }
}

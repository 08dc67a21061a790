//! Blob-store persistence abstraction
//!
//! The whole task collection lives under a single key as one opaque
//! string; stores move blobs, the service layer owns (de)serialization.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Result;

/// Durable key-value blob store holding the entire collection
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob; `Ok(None)` means nothing has been written yet
    async fn read(&self) -> Result<Option<String>>;

    /// Overwrite the blob
    async fn write(&self, contents: &str) -> Result<()>;
}

/// File-backed blob store
///
/// One file on disk holds the collection. The file is created on first
/// write; a missing file is not an error.
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(Some(contents))
    }

    async fn write(&self, contents: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

/// In-memory blob store for tests and embedding
#[derive(Default)]
pub struct MemoryBlobStore {
    contents: RwLock<Option<String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw blob as currently stored
    pub async fn snapshot(&self) -> Option<String> {
        self.contents.read().await.clone()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.read().await.clone())
    }

    async fn write(&self, contents: &str) -> Result<()> {
        *self.contents.write().await = Some(contents.to_string());
        Ok(())
    }
}

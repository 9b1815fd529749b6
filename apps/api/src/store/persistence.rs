//! Durable storage for the resume document: one named slot holding JSON text.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

/// Name of the single slot the whole document is stored under.
pub const STORAGE_SLOT: &str = "resumeBuilderData";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Backend for the document slot. Implementations must treat `remove` of an
/// absent slot as success.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    async fn read(&self) -> Result<Option<String>, StorageError>;
    async fn write(&self, contents: &str) -> Result<(), StorageError>;
    async fn remove(&self) -> Result<(), StorageError>;
}

// ────────────────────────────────────────────────────────────────────────────
// FileStorage
// ────────────────────────────────────────────────────────────────────────────

/// Stores the slot as `<dir>/resumeBuilderData.json`.
///
/// Writes land in a sibling temp file first and are renamed into place, so a
/// reader never observes a half-written document.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_SLOT}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl DocumentStorage for FileStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_err(e)),
        }
    }

    async fn write(&self, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_err(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| self.io_err(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_err(e))
    }

    async fn remove(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryStorage
// ────────────────────────────────────────────────────────────────────────────

/// In-process slot for ephemeral sessions (`STORAGE_BACKEND=memory`).
///
/// Counts writes so auto-save coalescing can be observed, and can be switched
/// into a failing mode to simulate an unavailable store.
#[derive(Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let storage = Self::default();
        *storage.lock() = Some(contents.into());
        storage
    }

    #[cfg(test)]
    pub fn contents(&self) -> Option<String> {
        self.lock().clone()
    }

    #[cfg(test)]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned slot still holds a usable value.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl DocumentStorage for MemoryStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.lock().clone())
    }

    async fn write(&self, contents: &str) -> Result<(), StorageError> {
        self.check()?;
        *self.lock() = Some(contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self) -> Result<(), StorageError> {
        self.check()?;
        *self.lock() = None;
        Ok(())
    }
}

//! Debounced persistence.
//!
//! Every mutation restarts a quiet-period timer; when it elapses without
//! another mutation, the latest document is written once. Storage operations
//! are serialized through `io`, so a clear issued while a write is in flight
//! waits for that write and then removes the slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::resume::ResumeDocument;
use crate::store::persistence::{DocumentStorage, StorageError};

pub struct AutoSaver {
    storage: Arc<dyn DocumentStorage>,
    quiet: Duration,
    latest: watch::Receiver<ResumeDocument>,
    pending: Mutex<Option<JoinHandle<()>>>,
    /// Bumped by every schedule, flush and clear. A timer only writes if its
    /// generation is still current once it holds the io lock.
    generation: Arc<AtomicU64>,
    io: Arc<tokio::sync::Mutex<()>>,
}

impl AutoSaver {
    pub fn new(
        storage: Arc<dyn DocumentStorage>,
        quiet: Duration,
        latest: watch::Receiver<ResumeDocument>,
    ) -> Self {
        Self {
            storage,
            quiet,
            latest,
            pending: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
            io: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Cancels any pending save and starts a new quiet period.
    pub fn schedule(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let current = self.generation.clone();
        let storage = self.storage.clone();
        let latest = self.latest.clone();
        let io = self.io.clone();
        let quiet = self.quiet;

        let timer = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let guard = io.lock_owned().await;
            if current.load(Ordering::Acquire) != generation {
                return;
            }
            let doc = latest.borrow().clone();
            // Detached so that aborting the timer can never cut a write short.
            let write = tokio::spawn(async move {
                let _guard = guard;
                if let Err(e) = persist(storage.as_ref(), &doc).await {
                    warn!("Auto-save failed, keeping in-memory document: {e}");
                } else {
                    debug!("Auto-saved resume document");
                }
            });
            let _ = write.await;
        });

        if let Some(previous) = self.pending_slot().replace(timer) {
            previous.abort();
        }
    }

    /// Writes `doc` immediately, superseding any pending timer.
    pub async fn save_now(&self, doc: &ResumeDocument) -> Result<(), StorageError> {
        self.cancel();
        let _guard = self.io.lock().await;
        persist(self.storage.as_ref(), doc).await
    }

    /// Writes the latest document now if a timer is still waiting.
    /// Returns whether a write was performed.
    pub async fn flush(&self) -> Result<bool, StorageError> {
        if !self.cancel() {
            return Ok(false);
        }
        let doc = self.latest.borrow().clone();
        let _guard = self.io.lock().await;
        persist(self.storage.as_ref(), &doc).await?;
        Ok(true)
    }

    /// Deletes the durable copy once any in-flight write has finished.
    ///
    /// Timers scheduled before the call are left alone; callers that want
    /// them gone cancel first.
    pub async fn remove(&self) -> Result<(), StorageError> {
        let _guard = self.io.lock().await;
        self.storage.remove().await
    }

    /// Invalidates the pending timer. Returns true if one had not yet fired.
    pub fn cancel(&self) -> bool {
        self.generation.fetch_add(1, Ordering::AcqRel);
        match self.pending_slot().take() {
            Some(timer) => {
                let waiting = !timer.is_finished();
                timer.abort();
                waiting
            }
            None => false,
        }
    }

    fn pending_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

async fn persist(storage: &dyn DocumentStorage, doc: &ResumeDocument) -> Result<(), StorageError> {
    let json = serde_json::to_string(doc)
        .map_err(|e| StorageError::Unavailable(format!("serialization failed: {e}")))?;
    storage.write(&json).await
}

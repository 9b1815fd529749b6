//! Resume Store — the single owner of the resume document.
//!
//! The document lives inside a `watch::Sender`; every write goes through the
//! methods below and every reader gets either a snapshot or a subscription.
//! Effective mutations re-broadcast the new state and restart the auto-save
//! timer. Updates and removals that match no entry are no-ops: nothing is
//! broadcast and nothing is saved.

pub mod autosave;
pub mod ids;
pub mod persistence;
pub mod skills;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::resume::{
    EducationEntry, EducationPatch, ExperienceEntry, ExperiencePatch, NewEducation, NewExperience,
    PersonalInfoPatch, ResumeDocument,
};
use crate::store::autosave::AutoSaver;
use crate::store::ids::EntryIdGenerator;
use crate::store::persistence::{DocumentStorage, StorageError};

#[derive(Clone)]
pub struct ResumeStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: watch::Sender<ResumeDocument>,
    ids: EntryIdGenerator,
    autosave: AutoSaver,
}

impl ResumeStore {
    /// Builds the store, reading the persisted document once.
    ///
    /// A missing slot, an unreadable slot, or corrupt JSON all fall back to the
    /// empty default; the failure is logged and otherwise swallowed.
    pub async fn hydrate(storage: Arc<dyn DocumentStorage>, quiet: Duration) -> Self {
        let doc = match storage.read().await {
            Ok(Some(json)) => match serde_json::from_str::<ResumeDocument>(&json) {
                Ok(doc) => {
                    info!(
                        "Hydrated resume document ({} education, {} experience, {} skills)",
                        doc.education.len(),
                        doc.experience.len(),
                        doc.skills.len()
                    );
                    doc
                }
                Err(e) => {
                    warn!("Discarding corrupt stored resume document: {e}");
                    ResumeDocument::default()
                }
            },
            Ok(None) => {
                info!("No stored resume document, starting empty");
                ResumeDocument::default()
            }
            Err(e) => {
                warn!("Could not read stored resume document, starting empty: {e}");
                ResumeDocument::default()
            }
        };

        let ids = EntryIdGenerator::new();
        doc.education.iter().for_each(|e| ids.observe(&e.id));
        doc.experience.iter().for_each(|e| ids.observe(&e.id));

        let (state, latest) = watch::channel(doc);
        let autosave = AutoSaver::new(storage, quiet, latest);

        Self {
            inner: Arc::new(StoreInner {
                state,
                ids,
                autosave,
            }),
        }
    }

    pub fn snapshot(&self) -> ResumeDocument {
        self.inner.state.borrow().clone()
    }

    /// Observes every effective change to the document.
    pub fn subscribe(&self) -> watch::Receiver<ResumeDocument> {
        self.inner.state.subscribe()
    }

    pub fn update_personal_info(&self, patch: PersonalInfoPatch) -> bool {
        self.mutate(|doc| doc.personal_info.apply(patch))
    }

    // ── Education ───────────────────────────────────────────────────────────

    pub fn add_education(&self, entry: NewEducation) -> EducationEntry {
        let entry = entry.with_id(self.inner.ids.next_id());
        let added = entry.clone();
        self.mutate(|doc| {
            doc.education.push(entry);
            true
        });
        added
    }

    /// Returns false when no entry has this id.
    pub fn update_education(&self, id: &str, patch: EducationPatch) -> bool {
        self.mutate(|doc| {
            doc.education
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| e.apply(patch))
                .unwrap_or(false)
        })
    }

    pub fn remove_education(&self, id: &str) -> bool {
        self.mutate(|doc| {
            let before = doc.education.len();
            doc.education.retain(|e| e.id != id);
            doc.education.len() != before
        })
    }

    // ── Experience ──────────────────────────────────────────────────────────

    pub fn add_experience(&self, entry: NewExperience) -> ExperienceEntry {
        let entry = entry.with_id(self.inner.ids.next_id());
        let added = entry.clone();
        self.mutate(|doc| {
            doc.experience.push(entry);
            true
        });
        added
    }

    pub fn update_experience(&self, id: &str, patch: ExperiencePatch) -> bool {
        self.mutate(|doc| {
            doc.experience
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| e.apply(patch))
                .unwrap_or(false)
        })
    }

    pub fn remove_experience(&self, id: &str) -> bool {
        self.mutate(|doc| {
            let before = doc.experience.len();
            doc.experience.retain(|e| e.id != id);
            doc.experience.len() != before
        })
    }

    // ── Skills ──────────────────────────────────────────────────────────────

    pub fn skills(&self) -> Vec<String> {
        self.inner.state.borrow().skills.clone()
    }

    /// Replaces the skill list wholesale. No de-duplication happens here; see
    /// [`skills`] for the helpers callers use to build the list.
    pub fn update_skills(&self, skills: Vec<String>) -> bool {
        self.mutate(|doc| {
            if doc.skills == skills {
                return false;
            }
            doc.skills = skills;
            true
        })
    }

    /// Computes the new skill list from the current one and stores it, as one
    /// step: no other mutation can slip in between the read and the write.
    /// An `Err` from `f` leaves the document untouched.
    pub fn edit_skills<E>(
        &self,
        f: impl FnOnce(&[String]) -> Result<Vec<String>, E>,
    ) -> Result<Vec<String>, E> {
        let mut outcome = None;
        self.mutate(|doc| match f(&doc.skills) {
            Ok(skills) => {
                let changed = doc.skills != skills;
                doc.skills = skills;
                outcome = Some(Ok(doc.skills.clone()));
                changed
            }
            Err(e) => {
                outcome = Some(Err(e));
                false
            }
        });
        outcome.unwrap_or_else(|| Ok(self.skills()))
    }

    // ── Lifecycle ───────────────────────────────────────────────────────────

    /// Resets to the empty default and deletes the durable copy right away.
    ///
    /// The in-memory reset always happens; the returned error only reports
    /// that the durable copy could not be removed.
    pub async fn clear_resume(&self) -> Result<(), StorageError> {
        // Cancel before the reset: an edit landing right after it schedules
        // its own save, which must survive.
        self.inner.autosave.cancel();
        self.inner.state.send_replace(ResumeDocument::default());
        let result = self.inner.autosave.remove().await;
        match &result {
            Ok(()) => info!("Resume cleared"),
            Err(e) => warn!("Resume cleared in memory but stored copy remains: {e}"),
        }
        result
    }

    /// Persists the current document immediately.
    pub async fn save_resume(&self) -> Result<(), StorageError> {
        let doc = self.snapshot();
        let result = self.inner.autosave.save_now(&doc).await;
        if let Err(e) = &result {
            warn!("Manual save failed: {e}");
        }
        result
    }

    /// Writes out an auto-save that is still waiting for its quiet period.
    pub async fn flush(&self) -> Result<bool, StorageError> {
        self.inner.autosave.flush().await
    }

    fn mutate(&self, f: impl FnOnce(&mut ResumeDocument) -> bool) -> bool {
        let changed = self.inner.state.send_if_modified(f);
        if changed {
            self.inner.autosave.schedule();
        }
        changed
    }
}

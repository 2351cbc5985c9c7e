//! Persistence for the set form in progress.
//!
//! A draft is only meaningful on the day it was started: a stored draft from
//! an earlier day is discarded when it is restored.

use crate::error::DraftStoreError;
use chrono::NaiveDate;
use gymlog_model::{Clock, SetDraft};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// A draft tagged with the local day it was saved on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredDraft {
    pub day: NaiveDate,
    pub draft: SetDraft,
}

pub trait DraftStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredDraft>, DraftStoreError>;
    fn save(&self, draft: &StoredDraft) -> Result<(), DraftStoreError>;
    fn clear(&self) -> Result<(), DraftStoreError>;
}

/// Returns today's draft, discarding one left over from another day.
pub fn restore_draft(
    store: &dyn DraftStore,
    clock: &dyn Clock,
) -> Result<Option<SetDraft>, DraftStoreError> {
    match store.load()? {
        Some(stored) if stored.day == clock.today() => Ok(Some(stored.draft)),
        Some(stored) => {
            debug!("discarding draft from {}", stored.day);
            store.clear()?;
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Saves `draft` under today's date.
pub fn persist_draft(
    store: &dyn DraftStore,
    clock: &dyn Clock,
    draft: &SetDraft,
) -> Result<(), DraftStoreError> {
    store.save(&StoredDraft {
        day: clock.today(),
        draft: draft.clone(),
    })
}

/// Draft store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    slot: Mutex<Option<StoredDraft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Result<Option<StoredDraft>, DraftStoreError> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, draft: &StoredDraft) -> Result<(), DraftStoreError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(draft.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftStoreError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Draft store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default draft location under the platform's local data directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gymlog")
            .join("draft.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    /// A missing file is no draft. An unreadable one is dropped with a
    /// warning rather than blocking the form.
    fn load(&self) -> Result<Option<StoredDraft>, DraftStoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(stored) => Ok(Some(stored)),
            Err(e) => {
                warn!("ignoring corrupt draft at {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }

    fn save(&self, draft: &StoredDraft) -> Result<(), DraftStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(draft)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

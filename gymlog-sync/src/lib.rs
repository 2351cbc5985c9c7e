//! Sync engine for the gymlog workout log.
//!
//! Keeps an optimistic in-memory copy of a remote, position-addressed log:
//! - Single-writer engine task fed by a command queue
//! - Optimistic apply with revert on failure or timeout
//! - Reload-based identifier reconciliation after appends and deletes
//! - Day-scoped persistence for the set form in progress

pub mod config;
pub mod draft_store;
pub mod engine;
pub mod error;
pub mod store;

pub use config::EngineConfig;
pub use draft_store::{
    persist_draft, restore_draft, DraftStore, FileDraftStore, MemoryDraftStore, StoredDraft,
};
pub use engine::{
    create_sync_engine, AppendOutcome, EngineCommand, LogHandle, LogSnapshot, SyncEngine,
};
pub use error::{DraftStoreError, StoreError, StoreResult, SyncError, SyncResult};
pub use store::{RemoteLogStore, Snapshot};

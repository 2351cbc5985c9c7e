//! Sync error types.

use gymlog_model::{EntryId, ProvisionalId, RemoteId, RowError, ValidationError};
use std::time::Duration;
use thiserror::Error;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Result type for remote store calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the sync engine.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid set: {0}")]
    Validation(#[from] ValidationError),

    #[error("entry {0} has not been saved yet")]
    NotYetPersisted(ProvisionalId),

    #[error("entry not found: {0}")]
    NotFound(EntryId),

    #[error("row {0} has moved since the last reload")]
    StaleId(RemoteId),

    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(#[from] StoreError),

    #[error("sync engine not running")]
    ChannelClosed,
}

impl SyncError {
    /// True when retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::RemoteUnavailable(e) => e.is_transient(),
            _ => false,
        }
    }
}

/// Failures of a single remote store call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),

    #[error("store returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed row {position}: {source}")]
    Malformed {
        position: usize,
        #[source]
        source: RowError,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// Transport failures, timeouts, 408, 429 and 5xx are worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Transport(_) | StoreError::Timeout(_) => true,
            StoreError::Status { status, .. } => matches!(status, 408 | 429 | 500..=599),
            StoreError::Malformed { .. } | StoreError::InvalidResponse(_) => false,
        }
    }
}

/// Errors from a draft store.
#[derive(Debug, Error)]
pub enum DraftStoreError {
    #[error("draft I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("draft serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Remote log store abstraction.
//!
//! Rows are addressed by their 1-based position (header excluded). A delete
//! shifts every later row up by one, and an append's position is only
//! learned from the next [`RemoteLogStore::list_all`].

use crate::error::StoreResult;
use async_trait::async_trait;
use gymlog_model::{Menu, RawRow, RemoteId};

/// Full read of the remote table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub menu: Menu,
    /// Insertion order: `rows[n - 1]` is the row at position `n`.
    pub rows: Vec<RawRow>,
}

#[async_trait]
pub trait RemoteLogStore: Send + Sync {
    /// Reads the menu and every log row.
    async fn list_all(&self) -> StoreResult<Snapshot>;

    /// Appends a row at the end of the table.
    async fn append(&self, row: &RawRow) -> StoreResult<()>;

    /// Overwrites the whole row at `id`.
    async fn update(&self, id: RemoteId, row: &RawRow) -> StoreResult<()>;

    /// Removes the row at `id`; later rows move up.
    async fn delete(&self, id: RemoteId) -> StoreResult<()>;
}

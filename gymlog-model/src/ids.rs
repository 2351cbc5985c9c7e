//! Entry identifiers.
//!
//! A logged set is addressed either by its row position in the remote table,
//! which is only known after a snapshot, or by a local placeholder assigned
//! when the set is first recorded. The two never mix: an entry carries
//! exactly one of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use uuid::Uuid;

/// 1-based row position in the remote log table, header excluded.
///
/// Positions shift when an earlier row is deleted, so a `RemoteId` is only
/// meaningful relative to the snapshot it was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(NonZeroU32);

impl RemoteId {
    /// Returns `None` for position 0.
    pub fn from_position(position: u32) -> Option<Self> {
        NonZeroU32::new(position).map(Self)
    }

    /// Raw row position. Only store adapters should need this.
    pub fn position(self) -> u32 {
        self.0.get()
    }

    /// True if deleting the `deleted` row moved this one up.
    pub fn shifted_by(self, deleted: RemoteId) -> bool {
        self > deleted
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for RemoteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        let position: u32 = digits
            .parse()
            .map_err(|_| format!("invalid row id {s:?}"))?;
        RemoteId::from_position(position).ok_or_else(|| "row ids start at 1".to_string())
    }
}

/// Local placeholder for an entry whose row has not been confirmed yet.
///
/// Time-ordered (UUID v7) so placeholders created later sort later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvisionalId(Uuid);

impl ProvisionalId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProvisionalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProvisionalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tmp-{}", self.0)
    }
}

/// Identity of an entry in the in-memory log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntryId {
    Provisional(ProvisionalId),
    Remote(RemoteId),
}

impl EntryId {
    pub fn remote(self) -> Option<RemoteId> {
        match self {
            EntryId::Remote(id) => Some(id),
            EntryId::Provisional(_) => None,
        }
    }

    pub fn provisional(self) -> Option<ProvisionalId> {
        match self {
            EntryId::Provisional(id) => Some(id),
            EntryId::Remote(_) => None,
        }
    }

    pub fn is_provisional(self) -> bool {
        matches!(self, EntryId::Provisional(_))
    }
}

impl From<RemoteId> for EntryId {
    fn from(id: RemoteId) -> Self {
        EntryId::Remote(id)
    }
}

impl From<ProvisionalId> for EntryId {
    fn from(id: ProvisionalId) -> Self {
        EntryId::Provisional(id)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Provisional(id) => write!(f, "{id}"),
            EntryId::Remote(id) => write!(f, "{id}"),
        }
    }
}

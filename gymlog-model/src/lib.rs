//! Workout log model for gymlog.
//!
//! Provides:
//! - Entry value objects and their two identity schemes (row position vs. local placeholder)
//! - The textual row codec used by the remote log table
//! - Set drafts, patches and validation
//! - Pure aggregations: day buckets, set numbering, autofill lookup, activity histogram

pub mod aggregate;
pub mod clock;
pub mod draft;
pub mod entry;
pub mod error;
pub mod ids;
pub mod menu;
pub mod row;

pub use clock::{Clock, FixedClock, SystemClock};
pub use draft::{SetDraft, ValidSet, REST_PRESETS};
pub use entry::{Entry, EntryPatch, Load, LoadUnit};
pub use error::{RowError, ValidationError};
pub use ids::{EntryId, ProvisionalId, RemoteId};
pub use menu::Menu;
pub use row::RawRow;

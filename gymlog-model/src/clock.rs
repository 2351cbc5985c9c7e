//! Time source and local calendar resolution.
//!
//! Day bucketing and set numbering depend on the user's local calendar day,
//! so everything that needs "now" or "which day is this timestamp" goes
//! through a [`Clock`] instead of reading the system clock directly.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use std::sync::Mutex;

pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Local UTC offset in effect at `instant`.
    fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset;

    fn now_timestamp(&self) -> i64 {
        self.now().timestamp()
    }

    /// Local wall-clock time of a Unix timestamp.
    fn local_datetime(&self, timestamp: i64) -> DateTime<FixedOffset> {
        let instant = DateTime::from_timestamp(timestamp, 0).unwrap_or_default();
        instant.with_timezone(&self.offset_at(instant))
    }

    fn local_date(&self, timestamp: i64) -> NaiveDate {
        self.local_datetime(timestamp).date_naive()
    }

    fn today(&self) -> NaiveDate {
        let now = self.now();
        now.with_timezone(&self.offset_at(now)).date_naive()
    }
}

/// The machine clock in the machine's time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        Local.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }
}

/// A settable clock with a fixed UTC offset, for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: Mutex::new(now),
            offset,
        }
    }

    /// Clock in UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn offset_at(&self, _instant: DateTime<Utc>) -> FixedOffset {
        self.offset
    }
}

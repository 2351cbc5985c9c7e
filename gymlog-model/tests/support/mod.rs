//! Shared fixtures for model tests.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use gymlog_model::{Entry, EntryId, FixedClock, Load, RemoteId};

/// UTC+8, the offset every fixture clock uses.
pub fn taipei() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

/// 2026-10-19 21:30 local.
pub fn evening_clock() -> FixedClock {
    FixedClock::new(local(2026, 10, 19, 21, 30), taipei())
}

pub fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    taipei()
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn entry(position: u32, at: DateTime<Utc>, exercise: &str, set_number: u32) -> Entry {
    Entry {
        id: EntryId::Remote(RemoteId::from_position(position).unwrap()),
        timestamp: at.timestamp(),
        exercise_name: exercise.to_string(),
        set_number,
        load: Load::kg(60.0),
        reps: 8,
        effort: 2.0,
        rest_seconds: Some(120),
        note: None,
    }
}

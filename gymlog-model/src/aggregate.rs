//! Pure views over the in-memory log.
//!
//! Nothing here mutates the log or assumes its order: set numbering and
//! chronological output sort by timestamp themselves. Local days are
//! resolved through the caller's [`Clock`].

use crate::clock::Clock;
use crate::entry::Entry;
use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Width of the activity histogram, in days.
pub const DEFAULT_HISTOGRAM_DAYS: usize = 90;

/// Density tier boundaries: a day lands in tier `i + 1` when its count
/// exceeds `thresholds[i]` (the last boundary exceeded wins).
pub const DEFAULT_THRESHOLDS: [usize; 4] = [0, 3, 6, 10];

/// Days shown before any "load more": today plus three past days.
pub const INITIAL_VISIBLE_DAYS: usize = 4;

/// Days added per "load more".
pub const VISIBLE_DAYS_PAGE: usize = 5;

/// Entries sharing a local calendar date, in log order.
#[derive(Clone, Debug, PartialEq)]
pub struct DayBucket<'a> {
    pub date: NaiveDate,
    pub entries: Vec<&'a Entry>,
}

/// One cell of the rolling activity histogram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistogramDay {
    pub date: NaiveDate,
    pub count: usize,
    /// 0 for an empty day, otherwise 1..=thresholds.len().
    pub tier: usize,
}

/// Groups entries by local date, most recent day first.
pub fn bucket_by_day<'a>(log: &'a [Entry], clock: &dyn Clock) -> Vec<DayBucket<'a>> {
    let mut days: BTreeMap<NaiveDate, Vec<&'a Entry>> = BTreeMap::new();
    for entry in log {
        days.entry(clock.local_date(entry.timestamp))
            .or_default()
            .push(entry);
    }
    days.into_iter()
        .rev()
        .map(|(date, entries)| DayBucket { date, entries })
        .collect()
}

/// Set number a new `exercise_name` entry on `day` would get.
///
/// Counts existing entries with exactly that name (case-sensitive, whole
/// composed name) on that local day, ignoring their stored set numbers.
pub fn compute_set_number(
    log: &[Entry],
    exercise_name: &str,
    day: NaiveDate,
    clock: &dyn Clock,
) -> u32 {
    let existing = log
        .iter()
        .filter(|e| e.exercise_name == exercise_name && clock.local_date(e.timestamp) == day)
        .count();
    u32::try_from(existing).unwrap_or(u32::MAX).saturating_add(1)
}

/// Most recent entry (first in log order) whose name contains the selected
/// verbs, space-joined, as a substring.
///
/// Substring matching means "press" also matches "incline bench press";
/// an empty selection matches nothing.
pub fn find_autofill_source<'a, S: AsRef<str>>(
    log: &'a [Entry],
    selected_verbs: &[S],
) -> Option<&'a Entry> {
    let needle = Entry::compose_exercise_name(std::iter::empty::<&str>(), selected_verbs);
    if needle.is_empty() {
        return None;
    }
    log.iter().find(|e| e.exercise_name.contains(&needle))
}

/// Tier for a day with `count` entries.
pub fn density_tier(count: usize, thresholds: &[usize]) -> usize {
    if count == 0 {
        return 0;
    }
    thresholds
        .iter()
        .rposition(|&t| count > t)
        .map_or(0, |i| i + 1)
}

/// Per-day counts for the `days` days ending today, oldest first.
pub fn rolling_histogram(
    log: &[Entry],
    days: usize,
    thresholds: &[usize],
    clock: &dyn Clock,
) -> Vec<HistogramDay> {
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for entry in log {
        *counts.entry(clock.local_date(entry.timestamp)).or_default() += 1;
    }

    let today = clock.today();
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back as u64)))
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            HistogramDay {
                date,
                count,
                tier: density_tier(count, thresholds),
            }
        })
        .collect()
}

/// Entries logged on `day`, oldest first.
pub fn entries_on<'a>(log: &'a [Entry], day: NaiveDate, clock: &dyn Clock) -> Vec<&'a Entry> {
    let mut entries: Vec<&Entry> = log
        .iter()
        .filter(|e| clock.local_date(e.timestamp) == day)
        .collect();
    entries.sort_by_key(|e| e.timestamp);
    entries
}

/// Plain-text summary of a day, one set per line, oldest first:
/// `HH:MM <exercise> Set<n> <load> x <reps> (RIR <effort>) Rest: <rest>`.
pub fn day_report(log: &[Entry], day: NaiveDate, clock: &dyn Clock) -> String {
    entries_on(log, day, clock)
        .into_iter()
        .map(|e| {
            format!(
                "{} {} Set{} {} x {} (RIR {}) Rest: {}",
                clock.local_datetime(e.timestamp).format("%H:%M"),
                e.exercise_name,
                e.set_number,
                e.load,
                e.reps,
                e.effort,
                e.rest_seconds.map(|r| r.to_string()).unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of day buckets to show after `load_more` extra pages.
pub fn visible_day_count(load_more: usize) -> usize {
    INITIAL_VISIBLE_DAYS.saturating_add(load_more.saturating_mul(VISIBLE_DAYS_PAGE))
}

pub fn visible_buckets<'b, 'a>(
    buckets: &'b [DayBucket<'a>],
    load_more: usize,
) -> &'b [DayBucket<'a>] {
    &buckets[..buckets.len().min(visible_day_count(load_more))]
}

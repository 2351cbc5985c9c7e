//! Plain-text rendering for terminal output.

use gymlog_model::aggregate::{DayBucket, HistogramDay};
use gymlog_model::{Clock, Entry, Menu, SetDraft};
use std::fmt::Write;

pub fn menu(menu: &Menu) -> String {
    format!(
        "modifiers: {}\nverbs:     {}",
        menu.modifiers.join(", "),
        menu.verbs.join(", ")
    )
}

/// One line per set: row id, local time, name, set number, load and reps,
/// effort, then rest and note when present.
pub fn entry_line(entry: &Entry, clock: &dyn Clock) -> String {
    let id = match entry.id.remote() {
        Some(id) => id.to_string(),
        None => "pending".to_string(),
    };
    let mut line = format!(
        "{id:>8}  {}  {} #{}  {} x {}  RIR {}",
        clock.local_datetime(entry.timestamp).format("%H:%M"),
        entry.exercise_name,
        entry.set_number,
        entry.load,
        entry.reps,
        entry.effort,
    );
    if let Some(rest) = entry.rest_seconds {
        let _ = write!(line, "  rest {rest}s");
    }
    if let Some(note) = &entry.note {
        let _ = write!(line, "  ({note})");
    }
    line
}

pub fn days(buckets: &[DayBucket<'_>], clock: &dyn Clock) -> String {
    let mut out = String::new();
    for bucket in buckets {
        let sets = bucket.entries.len();
        let _ = writeln!(
            out,
            "{}  {sets} {}",
            bucket.date.format("%a %Y-%m-%d"),
            if sets == 1 { "set" } else { "sets" }
        );
        for entry in &bucket.entries {
            let _ = writeln!(out, "{}", entry_line(entry, clock));
        }
    }
    out.trim_end().to_string()
}

/// Tier digits, one week per group, oldest first.
pub fn heatmap(days: &[HistogramDay]) -> String {
    let (Some(first), Some(last)) = (days.first(), days.last()) else {
        return String::new();
    };
    let cells = days
        .chunks(7)
        .map(|week| {
            week.iter()
                .map(|d| if d.tier == 0 { '.' } else { char::from(b'0' + d.tier.min(9) as u8) })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ");
    let total: usize = days.iter().map(|d| d.count).sum();
    format!("{} .. {}\n{cells}\n{total} sets", first.date, last.date)
}

pub fn draft(draft: &SetDraft) -> String {
    let show = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    let name = draft.exercise_name();
    format!(
        "exercise: {}\nload:     {}\nreps:     {}\nRIR:      {}\nrest:     {}\nnote:     {}",
        if name.is_empty() { "-".to_string() } else { name },
        show(draft.load_value.map(|v| format!("{v}{}", draft.load_unit.suffix()))),
        show(draft.reps.map(|r| r.to_string())),
        show(draft.effort.map(|e| e.to_string())),
        show(draft.rest_seconds.map(|r| format!("{r}s"))),
        show(draft.note.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
    use gymlog_model::{EntryId, FixedClock, Load, LoadUnit, ProvisionalId, RemoteId};
    use pretty_assertions::assert_eq;

    fn clock() -> FixedClock {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = offset
            .with_ymd_and_hms(2026, 10, 19, 20, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        FixedClock::new(now, offset)
    }

    fn bench(id: EntryId) -> Entry {
        Entry {
            id,
            // 2026-10-19 18:05 +08:00
            timestamp: 1_792_404_300,
            exercise_name: "incline bench press".into(),
            set_number: 2,
            load: Load::kg(62.5),
            reps: 8,
            effort: 1.5,
            rest_seconds: Some(120),
            note: Some("slow eccentric".into()),
        }
    }

    fn day(offset: u64, count: usize, tier: usize) -> HistogramDay {
        HistogramDay {
            date: NaiveDate::from_ymd_opt(2026, 10, 1)
                .unwrap()
                .checked_add_days(chrono::Days::new(offset))
                .unwrap(),
            count,
            tier,
        }
    }

    #[test]
    fn entry_line_shows_every_field() {
        let entry = bench(EntryId::Remote(RemoteId::from_position(12).unwrap()));
        assert_eq!(
            entry_line(&entry, &clock()),
            "     #12  18:05  incline bench press #2  62.5kg x 8  RIR 1.5  rest 120s  (slow eccentric)"
        );
    }

    #[test]
    fn provisional_entries_are_marked_pending() {
        let mut entry = bench(EntryId::Provisional(ProvisionalId::new()));
        entry.rest_seconds = None;
        entry.note = None;
        assert_eq!(
            entry_line(&entry, &clock()),
            " pending  18:05  incline bench press #2  62.5kg x 8  RIR 1.5"
        );
    }

    #[test]
    fn heatmap_groups_weeks() {
        let days: Vec<_> = (0..9)
            .map(|i| match i {
                3 => day(i, 2, 1),
                8 => day(i, 11, 4),
                _ => day(i, 0, 0),
            })
            .collect();
        assert_eq!(heatmap(&days), "2026-10-01 .. 2026-10-09\n...1... .4\n13 sets");
        assert_eq!(heatmap(&[]), "");
    }

    #[test]
    fn empty_draft_renders_dashes() {
        let rendered = draft(&SetDraft::default());
        assert!(rendered.starts_with("exercise: -\nload:     -"));
    }

    #[test]
    fn draft_shows_the_unit() {
        let rendered = draft(&SetDraft {
            verbs: vec!["plank".into()],
            load_value: Some(45.0),
            load_unit: LoadUnit::Duration,
            ..Default::default()
        });
        assert!(rendered.contains("exercise: plank\nload:     45s"));
    }

    #[test]
    fn menu_lists_both_columns() {
        let rendered = menu(&Menu::new(["incline"], ["bench press", "row"]));
        assert_eq!(rendered, "modifiers: incline\nverbs:     bench press, row");
    }
}

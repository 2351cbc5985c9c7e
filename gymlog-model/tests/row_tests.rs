mod support;

use gymlog_model::{Entry, EntryId, Load, LoadUnit, RawRow, RemoteId, RowError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn row3() -> RemoteId {
    RemoteId::from_position(3).unwrap()
}

// --- Load cell ---

#[test]
fn encodes_weight_and_duration() {
    assert_eq!(Load::kg(60.0).encode(), "60kg");
    assert_eq!(Load::kg(62.5).encode(), "62.5kg");
    assert_eq!(Load::seconds(45.0).encode(), "45s");
}

#[test]
fn decodes_suffixes() {
    assert_eq!(Load::decode("60kg").unwrap(), Load::kg(60.0));
    assert_eq!(Load::decode(" 62.5 kg ").unwrap(), Load::kg(62.5));
    assert_eq!(Load::decode("45s").unwrap(), Load::seconds(45.0));
    assert_eq!(Load::decode("20KG").unwrap(), Load::kg(20.0));
}

#[test]
fn bare_number_is_a_weight() {
    assert_eq!(Load::decode("80").unwrap().unit, LoadUnit::Weight);
}

#[test]
fn rejects_unknown_suffix_and_garbage() {
    assert_eq!(Load::decode("135lb"), Err(RowError::Load("135lb".into())));
    assert!(Load::decode("kg").is_err());
    assert!(Load::decode("").is_err());
    assert!(Load::decode("6.0.1kg").is_err());
}

proptest! {
    #[test]
    fn integer_loads_round_trip(value in 0u32..100_000, seconds in any::<bool>()) {
        let load = if seconds { Load::seconds(value as f64) } else { Load::kg(value as f64) };
        prop_assert_eq!(Load::decode(&load.encode()).unwrap(), load);
    }

    #[test]
    fn fractional_loads_round_trip(value in 0.0f64..10_000.0, seconds in any::<bool>()) {
        let load = if seconds { Load::seconds(value) } else { Load::kg(value) };
        prop_assert_eq!(Load::decode(&load.encode()).unwrap(), load);
    }
}

// --- Rows ---

#[test]
fn decodes_a_full_row() {
    let row = RawRow::from_cells([
        "1760835600",
        "incline  bench press",
        "2",
        "60kg",
        "8",
        "1.5",
        "120",
        " felt heavy ",
    ]);
    let entry = row.decode(row3()).unwrap();
    assert_eq!(
        entry,
        Entry {
            id: EntryId::Remote(row3()),
            timestamp: 1_760_835_600,
            exercise_name: "incline bench press".into(),
            set_number: 2,
            load: Load::kg(60.0),
            reps: 8,
            effort: 1.5,
            rest_seconds: Some(120),
            note: Some("felt heavy".into()),
        }
    );
}

#[test]
fn short_rows_leave_rest_and_note_empty() {
    let row = RawRow::from_cells(["1760835600", "plank", "1", "60s", "1", "0"]);
    let entry = row.decode(row3()).unwrap();
    assert_eq!(entry.rest_seconds, None);
    assert_eq!(entry.note, None);
    assert_eq!(entry.load, Load::seconds(60.0));
}

#[test]
fn bad_cells_are_reported_by_field() {
    let mut row = RawRow::from_cells(["yesterday", "squat", "1", "100kg", "5", "2"]);
    assert_eq!(row.decode(row3()), Err(RowError::Timestamp("yesterday".into())));

    row.timestamp = "1760835600".into();
    row.set_number = "0".into();
    assert!(matches!(row.decode(row3()), Err(RowError::Number { field: "set", .. })));

    row.set_number = "1".into();
    row.reps = "five".into();
    assert!(matches!(row.decode(row3()), Err(RowError::Number { field: "reps", .. })));

    row.reps = "5".into();
    row.exercise = "   ".into();
    assert_eq!(row.decode(row3()), Err(RowError::MissingExercise));
}

#[test]
fn encoding_an_entry_writes_all_eight_cells() {
    let entry = support::entry(4, support::local(2026, 10, 19, 8, 0), "row", 3);
    let cells = RawRow::from(&entry).into_cells();
    assert_eq!(
        cells,
        [
            entry.timestamp.to_string(),
            "row".to_string(),
            "3".to_string(),
            "60kg".to_string(),
            "8".to_string(),
            "2".to_string(),
            "120".to_string(),
            String::new(),
        ]
    );
}

#[test]
fn encoded_row_decodes_to_the_same_entry() {
    let mut entry = support::entry(5, support::local(2026, 10, 19, 8, 0), "deadlift", 1);
    entry.note = Some("belt".into());
    entry.rest_seconds = None;
    let decoded = RawRow::from(&entry).decode(RemoteId::from_position(5).unwrap()).unwrap();
    assert_eq!(decoded, entry);
}

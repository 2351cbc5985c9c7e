//! Textual row codec for the remote log table.
//!
//! The table has eight columns, in order: timestamp, exercise, set, load,
//! reps, effort, rest, note. Cells arrive as text (the sheet formats every
//! value), so decoding parses and validates each one.

use crate::entry::{Entry, Load};
use crate::error::RowError;
use crate::ids::{EntryId, RemoteId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of columns in a log row.
pub const COLUMN_COUNT: usize = 8;

/// One data row of the remote log table, cell by cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub timestamp: String,
    pub exercise: String,
    pub set_number: String,
    pub load: String,
    pub reps: String,
    pub effort: String,
    pub rest_seconds: String,
    pub note: String,
}

impl RawRow {
    /// Builds a row from positional cells. Missing trailing cells are empty,
    /// extra cells are ignored.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells = cells.into_iter().map(Into::into);
        let mut next = || cells.next().unwrap_or_default();
        Self {
            timestamp: next(),
            exercise: next(),
            set_number: next(),
            load: next(),
            reps: next(),
            effort: next(),
            rest_seconds: next(),
            note: next(),
        }
    }

    pub fn into_cells(self) -> [String; COLUMN_COUNT] {
        [
            self.timestamp,
            self.exercise,
            self.set_number,
            self.load,
            self.reps,
            self.effort,
            self.rest_seconds,
            self.note,
        ]
    }

    /// Parses the row into an entry addressed by `id`.
    pub fn decode(&self, id: RemoteId) -> Result<Entry, RowError> {
        let timestamp: i64 = self
            .timestamp
            .trim()
            .parse()
            .map_err(|_| RowError::Timestamp(self.timestamp.clone()))?;

        let exercise_name = Entry::normalize_exercise_name(&self.exercise);
        if exercise_name.is_empty() {
            return Err(RowError::MissingExercise);
        }

        let set_number: u32 = parse_cell("set", &self.set_number)?;
        if set_number == 0 {
            return Err(RowError::Number {
                field: "set",
                value: self.set_number.clone(),
            });
        }

        let effort: f64 = parse_cell("effort", &self.effort)?;
        if !effort.is_finite() {
            return Err(RowError::Number {
                field: "effort",
                value: self.effort.clone(),
            });
        }

        let rest_seconds = match self.rest_seconds.trim() {
            "" => None,
            _ => Some(parse_cell("rest", &self.rest_seconds)?),
        };

        let note = Some(self.note.trim())
            .filter(|n| !n.is_empty())
            .map(String::from);

        Ok(Entry {
            id: EntryId::Remote(id),
            timestamp,
            exercise_name,
            set_number,
            load: Load::decode(&self.load)?,
            reps: parse_cell("reps", &self.reps)?,
            effort,
            rest_seconds,
            note,
        })
    }
}

impl From<&Entry> for RawRow {
    fn from(entry: &Entry) -> Self {
        Self {
            timestamp: entry.timestamp.to_string(),
            exercise: entry.exercise_name.clone(),
            set_number: entry.set_number.to_string(),
            load: entry.load.encode(),
            reps: entry.reps.to_string(),
            effort: entry.effort.to_string(),
            rest_seconds: entry.rest_seconds.map(|r| r.to_string()).unwrap_or_default(),
            note: entry.note.clone().unwrap_or_default(),
        }
    }
}

fn parse_cell<T: FromStr>(field: &'static str, value: &str) -> Result<T, RowError> {
    value.trim().parse().map_err(|_| RowError::Number {
        field,
        value: value.to_string(),
    })
}

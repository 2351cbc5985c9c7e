//! Logged sets.

use crate::error::{RowError, ValidationError};
use crate::ids::EntryId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the load magnitude measures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadUnit {
    /// Kilograms on the bar.
    #[default]
    Weight,
    /// Seconds under tension (planks, holds).
    Duration,
}

impl LoadUnit {
    /// Suffix used in the persisted load cell.
    pub fn suffix(self) -> &'static str {
        match self {
            LoadUnit::Weight => "kg",
            LoadUnit::Duration => "s",
        }
    }
}

/// A load magnitude with its unit.
///
/// Persisted as a single cell, `<magnitude><suffix>` (`60kg`, `62.5kg`,
/// `45s`). The magnitude is printed in its shortest round-trip form.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub value: f64,
    pub unit: LoadUnit,
}

impl Load {
    pub fn kg(value: f64) -> Self {
        Self {
            value,
            unit: LoadUnit::Weight,
        }
    }

    pub fn seconds(value: f64) -> Self {
        Self {
            value,
            unit: LoadUnit::Duration,
        }
    }

    pub fn encode(&self) -> String {
        format!("{}{}", self.value, self.unit.suffix())
    }

    /// Splits the cell at the first character that cannot belong to the
    /// number. A bare number is a weight (cells typed by hand in the sheet).
    pub fn decode(cell: &str) -> Result<Self, RowError> {
        let cell = cell.trim();
        let split = cell
            .char_indices()
            .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
            .map_or(cell.len(), |(i, _)| i);
        let (magnitude, suffix) = cell.split_at(split);

        let value: f64 = magnitude
            .parse()
            .map_err(|_| RowError::Load(cell.to_string()))?;
        if !value.is_finite() {
            return Err(RowError::Load(cell.to_string()));
        }

        let suffix = suffix.trim();
        let unit = if suffix.is_empty() || suffix.eq_ignore_ascii_case("kg") {
            LoadUnit::Weight
        } else if suffix.eq_ignore_ascii_case("s") {
            LoadUnit::Duration
        } else {
            return Err(RowError::Load(cell.to_string()));
        };

        Ok(Self { value, unit })
    }
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Load {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Load::decode(s)
    }
}

/// One logged set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Seconds since the Unix epoch, assigned by the client.
    pub timestamp: i64,
    pub exercise_name: String,
    /// 1 + same-exercise sets earlier that day, fixed at creation.
    pub set_number: u32,
    pub load: Load,
    pub reps: u32,
    /// Reps in reserve.
    pub effort: f64,
    pub rest_seconds: Option<u32>,
    pub note: Option<String>,
}

impl Entry {
    /// Builds the display name: modifiers first, then verbs, space-joined.
    /// Whitespace inside a token is collapsed the same way a decoded row is,
    /// and empty tokens are dropped.
    pub fn compose_exercise_name<M, V>(modifiers: M, verbs: V) -> String
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let mut words: Vec<String> = Vec::new();
        for token in modifiers.into_iter() {
            words.extend(token.as_ref().split_whitespace().map(str::to_string));
        }
        for token in verbs.into_iter() {
            words.extend(token.as_ref().split_whitespace().map(str::to_string));
        }
        words.join(" ")
    }

    /// Collapses runs of whitespace so hand-edited sheet cells still match.
    pub fn normalize_exercise_name(name: &str) -> String {
        name.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn is_persisted(&self) -> bool {
        !self.id.is_provisional()
    }

    /// Applies every field the patch carries.
    pub fn apply(&mut self, patch: &EntryPatch) {
        if let Some(name) = &patch.exercise_name {
            self.exercise_name = Entry::normalize_exercise_name(name);
        }
        if let Some(load) = patch.load {
            self.load = load;
        }
        if let Some(reps) = patch.reps {
            self.reps = reps;
        }
        if let Some(effort) = patch.effort {
            self.effort = effort;
        }
        if let Some(rest) = patch.rest_seconds {
            self.rest_seconds = rest;
        }
        if let Some(note) = &patch.note {
            self.note = note.as_deref().map(str::trim).filter(|n| !n.is_empty()).map(String::from);
        }
    }
}

/// Edits to a persisted entry. `None` leaves a field alone; the nested
/// options on rest and note allow clearing them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<Load>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<Option<String>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self == &EntryPatch::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.exercise_name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyExerciseName);
            }
        }
        if let Some(load) = &self.load {
            if !load.value.is_finite() {
                return Err(ValidationError::NotFinite("load"));
            }
        }
        if let Some(effort) = self.effort {
            if !effort.is_finite() {
                return Err(ValidationError::NotFinite("effort"));
            }
        }
        Ok(())
    }
}

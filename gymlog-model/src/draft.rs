//! The set being filled in before it is logged.

use crate::entry::{Entry, Load, LoadUnit};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Rest shortcuts offered next to the rest field, in seconds.
pub const REST_PRESETS: [u32; 3] = [90, 120, 180];

/// An unsubmitted set. Every measured field is optional until validation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SetDraft {
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub verbs: Vec<String>,
    #[serde(default)]
    pub load_value: Option<f64>,
    #[serde(default)]
    pub load_unit: LoadUnit,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub effort: Option<f64>,
    #[serde(default)]
    pub rest_seconds: Option<u32>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A draft that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidSet {
    pub exercise_name: String,
    pub load: Load,
    pub reps: u32,
    pub effort: f64,
    pub rest_seconds: Option<u32>,
    pub note: Option<String>,
}

impl SetDraft {
    pub fn exercise_name(&self) -> String {
        Entry::compose_exercise_name(&self.modifiers, &self.verbs)
    }

    /// Requires a verb, a load, reps and effort.
    pub fn validate(&self) -> Result<ValidSet, ValidationError> {
        if self.verbs.iter().all(|v| v.trim().is_empty()) {
            return Err(ValidationError::MissingVerb);
        }
        let exercise_name = self.exercise_name();

        let load_value = self.load_value.ok_or(ValidationError::MissingField("load"))?;
        if !load_value.is_finite() {
            return Err(ValidationError::NotFinite("load"));
        }
        let reps = self.reps.ok_or(ValidationError::MissingField("reps"))?;
        let effort = self.effort.ok_or(ValidationError::MissingField("effort"))?;
        if !effort.is_finite() {
            return Err(ValidationError::NotFinite("effort"));
        }

        Ok(ValidSet {
            exercise_name,
            load: Load {
                value: load_value,
                unit: self.load_unit,
            },
            reps,
            effort,
            rest_seconds: self.rest_seconds,
            note: self
                .note
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
        })
    }

    /// Adds the verb if absent, removes it if present. Returns whether it is
    /// now selected.
    pub fn toggle_verb(&mut self, verb: &str) -> bool {
        toggle(&mut self.verbs, verb)
    }

    pub fn toggle_modifier(&mut self, modifier: &str) -> bool {
        toggle(&mut self.modifiers, modifier)
    }

    /// Copies the measured fields of a previous set. The exercise selection
    /// and the note are left as they are.
    pub fn apply_autofill(&mut self, source: &Entry) {
        self.load_value = Some(source.load.value);
        self.load_unit = source.load.unit;
        self.reps = Some(source.reps);
        self.effort = Some(source.effort);
        self.rest_seconds = source.rest_seconds;
    }
}

fn toggle(selection: &mut Vec<String>, item: &str) -> bool {
    if let Some(pos) = selection.iter().position(|s| s == item) {
        selection.remove(pos);
        false
    } else {
        selection.push(item.to_string());
        true
    }
}

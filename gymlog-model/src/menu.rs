//! Exercise vocabulary.

use crate::entry::Entry;
use serde::{Deserialize, Serialize};

/// Modifiers ("incline", "single-arm") and verbs ("bench press", "row")
/// offered when composing an exercise name. Fixed for a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub modifiers: Vec<String>,
    pub verbs: Vec<String>,
}

impl Menu {
    /// Collapses whitespace in every token and drops blanks.
    pub fn new<M, V>(modifiers: M, verbs: V) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            modifiers: clean(modifiers),
            verbs: clean(verbs),
        }
    }

    /// Reads the two-column menu tab: modifiers in the first column, verbs
    /// in the second. Columns have independent lengths, so rows may be
    /// ragged or hold blanks.
    pub fn from_columns(rows: &[Vec<String>]) -> Self {
        Self::new(
            rows.iter().filter_map(|r| r.first().cloned()),
            rows.iter().filter_map(|r| r.get(1).cloned()),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.verbs.is_empty()
    }

    pub fn has_verb(&self, verb: &str) -> bool {
        self.verbs.iter().any(|v| v == verb)
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }
}

fn clean<I>(tokens: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    tokens
        .into_iter()
        .map(Into::into)
        .map(|t: String| Entry::normalize_exercise_name(&t))
        .filter(|t| !t.is_empty())
        .collect()
}

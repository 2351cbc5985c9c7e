//! Model error types.

use thiserror::Error;

/// A row read from the remote table could not be turned into an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("invalid timestamp {0:?}")]
    Timestamp(String),

    #[error("missing exercise name")]
    MissingExercise,

    #[error("invalid {field} {value:?}")]
    Number { field: &'static str, value: String },

    #[error("invalid load {0:?}")]
    Load(String),
}

/// User input rejected before any state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("select at least one exercise verb")]
    MissingVerb,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("exercise name cannot be empty")]
    EmptyExerciseName,

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
}

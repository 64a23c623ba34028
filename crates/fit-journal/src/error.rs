// error.rs — Error types for the activity journal.

use fit_goal::GoalError;
use thiserror::Error;

/// Errors that can occur while logging workouts and meals.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The underlying store failed to persist a collection.
    #[error(transparent)]
    Store(#[from] GoalError),

    /// A required field was missing or unusable.
    #[error("invalid {field}: {reason}")]
    InvalidEntry { field: &'static str, reason: String },
}

impl JournalError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        JournalError::InvalidEntry {
            field,
            reason: reason.into(),
        }
    }
}

// error.rs — Error types for the goal tracking subsystem.

use thiserror::Error;

/// Errors that can occur during goal engine operations.
///
/// Bad numeric input and id misses are never errors: they degrade to
/// defaults and no-ops. What remains is persistence failure, plus
/// `InvalidGoal` when strict validation has been switched on.
#[derive(Debug, Error)]
pub enum GoalError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize goal data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A goal was rejected by strict validation.
    #[error("invalid goal \"{title}\": {reason}")]
    InvalidGoal { title: String, reason: String },

    /// An event listener failed (non-fatal).
    #[error("notification error: {0}")]
    NotificationError(String),
}

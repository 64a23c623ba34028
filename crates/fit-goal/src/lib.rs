//! # fit-goal
//!
//! Goal progress tracking and the goal → achievement lifecycle for the
//! fitness tracker.
//!
//! A [`Goal`] carries starting, current and target values; its progress is
//! an integer percentage computed by [`progress_percent`]. When an update
//! drives progress to 100, the [`GoalEngine`] moves the goal into the
//! achievements list in a single step.
//!
//! ## Key components
//!
//! - [`GoalEngine`] — owns active goals and achievements; the only mutation path
//! - [`progress_percent`] — the pure, clamped progress function
//! - [`KeyValueStore`] — blob persistence ([`MemoryStore`], [`FileStore`])
//! - [`FitEvent`] / [`Notifier`] — what changed, fanned out to listeners such as [`History`]
//! - [`parse`] — lenient numeric parsing shared by every form-style input

pub mod engine;
pub mod error;
pub mod events;
pub mod goal;
pub mod parse;
pub mod store;

pub use engine::{EngineOptions, GoalEngine, ProgressUpdate};
pub use error::GoalError;
pub use events::{EventSink, FitEvent, History, Notifier};
pub use goal::{
    next_record_id, progress_percent, Achievement, Goal, GoalType, NewGoal, Profile,
    ProfileDetails, RecordId,
};
pub use store::{load_records, FileStore, KeyValueStore, MemoryStore};

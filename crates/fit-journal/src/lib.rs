//! # fit-journal
//!
//! Workout and meal logging for the fitness tracker, plus the statistics the
//! dashboard and progress views are built from.
//!
//! ## Key components
//!
//! - [`ActivityJournal`] — owns the workout and meal logs, persisted through
//!   the same [`fit_goal::KeyValueStore`] as the goal engine
//! - [`summary`] — pure statistics over the logs and achievements

pub mod error;
pub mod journal;
pub mod summary;

pub use error::JournalError;
pub use journal::{ActivityJournal, Intensity, Meal, NewMeal, NewWorkout, Workout};

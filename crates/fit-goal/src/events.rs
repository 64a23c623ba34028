// events.rs — What happened to goals and the journal, and who hears about it.
//
// Each mutation that reached the store yields one `FitEvent`. Listeners
// subscribe to a `Notifier`. Two listeners exist today: the CLI's announcer,
// which celebrates completed goals, and `History`, an append-only
// `history.jsonl` that `fit history` reads back as an activity timeline.
//
// A listener failure never undoes the mutation; the store write already
// happened.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::goal::{Achievement, Goal, GoalType, RecordId};

/// Something that happened to a goal, an achievement or the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum FitEvent {
    GoalCreated {
        goal_id: RecordId,
        title: String,
        goal_type: GoalType,
        progress: u8,
        timestamp: DateTime<Utc>,
    },

    /// New current value, still below 100%.
    GoalProgressUpdated {
        goal_id: RecordId,
        title: String,
        current_value: f64,
        progress: u8,
        timestamp: DateTime<Utc>,
    },

    /// The goal hit 100% and is now an achievement.
    GoalCompleted {
        goal_id: RecordId,
        title: String,
        goal_type: GoalType,
        completed_at: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },

    GoalRemoved {
        goal_id: RecordId,
        timestamp: DateTime<Utc>,
    },

    AchievementRemoved {
        achievement_id: RecordId,
        timestamp: DateTime<Utc>,
    },

    AchievementsCleared {
        count: usize,
        timestamp: DateTime<Utc>,
    },

    WorkoutLogged {
        workout_id: RecordId,
        activity_type: String,
        duration_minutes: i64,
        timestamp: DateTime<Utc>,
    },

    MealLogged {
        meal_id: RecordId,
        meal_type: String,
        calories: i64,
        timestamp: DateTime<Utc>,
    },
}

impl FitEvent {
    /// The `event_type` tag, as written to the history file.
    pub fn event_type(&self) -> &'static str {
        match self {
            FitEvent::GoalCreated { .. } => "goal_created",
            FitEvent::GoalProgressUpdated { .. } => "goal_progress_updated",
            FitEvent::GoalCompleted { .. } => "goal_completed",
            FitEvent::GoalRemoved { .. } => "goal_removed",
            FitEvent::AchievementRemoved { .. } => "achievement_removed",
            FitEvent::AchievementsCleared { .. } => "achievements_cleared",
            FitEvent::WorkoutLogged { .. } => "workout_logged",
            FitEvent::MealLogged { .. } => "meal_logged",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            FitEvent::GoalCreated { timestamp, .. }
            | FitEvent::GoalProgressUpdated { timestamp, .. }
            | FitEvent::GoalCompleted { timestamp, .. }
            | FitEvent::GoalRemoved { timestamp, .. }
            | FitEvent::AchievementRemoved { timestamp, .. }
            | FitEvent::AchievementsCleared { timestamp, .. }
            | FitEvent::WorkoutLogged { timestamp, .. }
            | FitEvent::MealLogged { timestamp, .. } => *timestamp,
        }
    }

    /// One-line description for timelines.
    pub fn describe(&self) -> String {
        match self {
            FitEvent::GoalCreated { title, progress, .. } => {
                format!("New goal \"{}\" ({}%)", title, progress)
            }
            FitEvent::GoalProgressUpdated { title, progress, .. } => {
                format!("\"{}\" is at {}%", title, progress)
            }
            FitEvent::GoalCompleted { title, goal_type, .. } => {
                format!("Completed \"{}\" ({})", title, goal_type.label())
            }
            FitEvent::GoalRemoved { goal_id, .. } => format!("Removed goal {}", goal_id),
            FitEvent::AchievementRemoved { achievement_id, .. } => {
                format!("Removed achievement {}", achievement_id)
            }
            FitEvent::AchievementsCleared { count, .. } => {
                format!("Cleared {} achievement(s)", count)
            }
            FitEvent::WorkoutLogged {
                activity_type,
                duration_minutes,
                ..
            } => format!("{} for {} minutes", activity_type, duration_minutes),
            FitEvent::MealLogged {
                meal_type, calories, ..
            } => format!("{} - {} calories", meal_type, calories),
        }
    }

    pub fn goal_created(goal: &Goal) -> Self {
        FitEvent::GoalCreated {
            goal_id: goal.id,
            title: goal.title.clone(),
            goal_type: goal.goal_type,
            progress: goal.progress,
            timestamp: Utc::now(),
        }
    }

    pub fn goal_progress_updated(goal: &Goal) -> Self {
        FitEvent::GoalProgressUpdated {
            goal_id: goal.id,
            title: goal.title.clone(),
            current_value: goal.current_value,
            progress: goal.progress,
            timestamp: Utc::now(),
        }
    }

    pub fn goal_completed(achievement: &Achievement) -> Self {
        FitEvent::GoalCompleted {
            goal_id: achievement.id(),
            title: achievement.goal.title.clone(),
            goal_type: achievement.goal.goal_type,
            completed_at: achievement.completed_at,
            timestamp: Utc::now(),
        }
    }
}

/// A listener for [`FitEvent`]s.
pub trait EventSink {
    fn notify(&self, event: &FitEvent) -> Result<(), GoalError>;
}

/// Append-only activity history, one JSON event per line.
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every recorded event, oldest first. A missing file is an empty
    /// history; lines that don't decode are skipped.
    pub fn entries(&self) -> Result<Vec<FitEvent>, GoalError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;

        let mut events = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(event) => events.push(event),
                Err(e) => tracing::warn!(line = number + 1, "skipping unreadable history entry: {}", e),
            }
        }
        Ok(events)
    }

    /// The newest `limit` events, oldest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<FitEvent>, GoalError> {
        let mut events = self.entries()?;
        let skip = events.len().saturating_sub(limit);
        Ok(events.split_off(skip))
    }

    fn io_error(&self, source: std::io::Error) -> GoalError {
        GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl EventSink for History {
    fn notify(&self, event: &FitEvent) -> Result<(), GoalError> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|source| self.io_error(source))
    }
}

/// Fans events out to every subscribed listener.
#[derive(Default)]
pub struct Notifier {
    listeners: Vec<Box<dyn EventSink>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(mut self, listener: impl EventSink + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Deliver `event` to every listener and return how many accepted it.
    pub fn publish(&self, event: &FitEvent) -> usize {
        tracing::debug!(event_type = event.event_type(), "publishing event");
        self.listeners
            .iter()
            .filter(|listener| match listener.notify(event) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(event_type = event.event_type(), "event listener failed: {}", e);
                    false
                }
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct Collect(Rc<RefCell<Vec<&'static str>>>);

    impl EventSink for Collect {
        fn notify(&self, event: &FitEvent) -> Result<(), GoalError> {
            self.0.borrow_mut().push(event.event_type());
            Ok(())
        }
    }

    struct Offline;

    impl EventSink for Offline {
        fn notify(&self, _event: &FitEvent) -> Result<(), GoalError> {
            Err(GoalError::NotificationError("offline".to_string()))
        }
    }

    fn workout(minutes: i64) -> FitEvent {
        FitEvent::WorkoutLogged {
            workout_id: 7,
            activity_type: "Cycling".to_string(),
            duration_minutes: minutes,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn event_json_is_tagged_by_type() {
        let event = FitEvent::AchievementsCleared {
            count: 3,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event_type\":\"achievements_cleared\""));
        let restored: FitEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
    }

    #[test]
    fn describe_reads_like_a_timeline() {
        assert_eq!(workout(40).describe(), "Cycling for 40 minutes");
        let done = FitEvent::GoalCompleted {
            goal_id: 1,
            title: "Run 50 km".to_string(),
            goal_type: GoalType::Distance,
            completed_at: Utc::now(),
            timestamp: Utc::now(),
        };
        assert_eq!(done.describe(), "Completed \"Run 50 km\" (Distance Goal)");
    }

    #[test]
    fn history_round_trips_through_the_file() {
        let dir = tempdir().unwrap();
        let history = History::new(dir.path().join("nested/history.jsonl"));
        assert!(history.entries().unwrap().is_empty());

        for minutes in [10, 20, 30] {
            history.notify(&workout(minutes)).unwrap();
        }

        let all = history.entries().unwrap();
        assert_eq!(all.len(), 3);
        let recent = history.recent(2).unwrap();
        assert_eq!(recent, all[1..].to_vec());
    }

    #[test]
    fn history_skips_corrupt_lines() {
        let dir = tempdir().unwrap();
        let history = History::new(dir.path().join("history.jsonl"));
        history.notify(&workout(15)).unwrap();
        let mut file = OpenOptions::new().append(true).open(history.path()).unwrap();
        writeln!(file, "{{truncated").unwrap();
        history.notify(&workout(25)).unwrap();

        assert_eq!(history.entries().unwrap().len(), 2);
    }

    #[test]
    fn failing_listener_does_not_block_others() {
        let seen = Collect::default();
        let notifier = Notifier::new().subscribe(Offline).subscribe(seen.clone());

        assert_eq!(notifier.publish(&workout(5)), 1);
        assert_eq!(*seen.0.borrow(), vec!["workout_logged"]);
    }
}

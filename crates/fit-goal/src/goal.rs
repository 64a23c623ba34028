// goal.rs — Goal, Achievement, and the progress function.
//
// A Goal is a user-defined target ("Lose 7 kg", "Run 100 km"). Its progress
// is an integer percentage derived from the starting, current and target
// values according to the goal type:
//
//   weight_loss:  (start − current) / (start − target)
//   weight_gain:  (current − start) / (target − start)
//   otherwise:    current / target
//
// Once progress reaches 100 the goal is frozen into an Achievement. The
// engine (engine.rs) owns that transition; this file only holds the data
// types and the pure math.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::parse::{lenient_f64, lenient_opt_f64, lenient_opt_i64, lenient_records, lenient_timestamp};

/// Identifier shared by goals, achievements, workouts and meals.
///
/// Stored blobs use plain integers (Unix milliseconds at creation time), so
/// this stays a `u64` rather than a UUID.
pub type RecordId = u64;

/// Issue a fresh id: the current Unix time in milliseconds, bumped past
/// `high_water` so ids stay unique even when two records are created in
/// the same millisecond. `high_water` is advanced to the returned id.
pub fn next_record_id(high_water: &mut RecordId) -> RecordId {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let id = now.max(high_water.saturating_add(1));
    *high_water = id;
    id
}

/// The kind of goal, which selects the progress formula.
///
/// Unknown or missing values fall back to `Increase`, both when parsing
/// user input and when reading a stored blob. That is why `Deserialize` is
/// written by hand instead of derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    WeightLoss,
    WeightGain,
    Workouts,
    Distance,
    Time,
    #[default]
    Increase,
}

impl GoalType {
    /// All goal types, in the order a picker would show them.
    pub const ALL: [GoalType; 6] = [
        GoalType::WeightLoss,
        GoalType::WeightGain,
        GoalType::Workouts,
        GoalType::Distance,
        GoalType::Time,
        GoalType::Increase,
    ];

    /// The wire name (`"weight_loss"`, `"increase"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::WeightLoss => "weight_loss",
            GoalType::WeightGain => "weight_gain",
            GoalType::Workouts => "workouts",
            GoalType::Distance => "distance",
            GoalType::Time => "time",
            GoalType::Increase => "increase",
        }
    }

    /// Parse a goal type leniently. Anything unrecognized is `Increase`.
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        GoalType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .unwrap_or_default()
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            GoalType::WeightLoss => "Weight Loss",
            GoalType::WeightGain => "Weight Gain",
            GoalType::Workouts => "Workout Count",
            GoalType::Distance => "Distance Goal",
            GoalType::Time => "Exercise Time",
            GoalType::Increase => "Custom Goal (Increase)",
        }
    }

    /// The unit suggested when the user doesn't supply one.
    pub fn default_unit(&self) -> &'static str {
        match self {
            GoalType::WeightLoss | GoalType::WeightGain => "kg",
            GoalType::Workouts => "workouts",
            GoalType::Distance => "km",
            GoalType::Time => "hours",
            GoalType::Increase => "",
        }
    }

    /// Weight goals measure movement away from a starting value.
    pub fn is_weight(&self) -> bool {
        matches!(self, GoalType::WeightLoss | GoalType::WeightGain)
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GoalType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(GoalType::parse_lenient)
            .unwrap_or_default())
    }
}

/// Compute a goal's progress as an integer percentage in `0..=100`.
///
/// Total and side-effect free. Returns 0 when the target is zero or not
/// finite, when `current` is NaN, or when a weight goal points the wrong
/// way (a "loss" whose target is not below the start, or a "gain" whose
/// target is not above it).
pub fn progress_percent(goal_type: GoalType, starting: f64, current: f64, target: f64) -> u8 {
    if target == 0.0 || !target.is_finite() || current.is_nan() {
        return 0;
    }

    let ratio = match goal_type {
        GoalType::WeightLoss => {
            if starting.partial_cmp(&target) != Some(Ordering::Greater) {
                return 0;
            }
            (starting - current) / (starting - target)
        }
        GoalType::WeightGain => {
            if starting.partial_cmp(&target) != Some(Ordering::Less) {
                return 0;
            }
            (current - starting) / (target - starting)
        }
        GoalType::Distance | GoalType::Workouts | GoalType::Time | GoalType::Increase => {
            current / target
        }
    };

    clamp_percent(ratio * 100.0)
}

/// Clamp to [0, 100] and round half up. NaN maps to 0.
fn clamp_percent(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}

/// Deserialize a stored progress value; garbage becomes 0.
fn lenient_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(clamp_percent(lenient_f64(deserializer)?))
}

/// A tracked objective in the active collection.
///
/// Field names serialize as camelCase (`goalType`, `currentValue`, ...) so
/// profile blobs written by the browser version of the app load unchanged.
/// Unknown keys are kept in `extra`, as on [`Profile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Unique identifier, assigned at creation and never reused.
    pub id: RecordId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub goal_type: GoalType,

    /// Display unit ("kg", "km"). Never used in computation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Baseline captured at creation.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub starting_value: f64,

    /// Mutated over the goal's life by progress updates.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub current_value: f64,

    /// Fixed at creation.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub target_value: f64,

    /// Display-only due date, kept as the user typed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,

    /// Derived percentage; always recomputable from the other fields.
    #[serde(default, deserialize_with = "lenient_percent")]
    pub progress: u8,

    /// Creation time. Missing or unreadable in a stored blob → Unix epoch.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Goal {
    /// Progress of this goal as it stands right now.
    pub fn compute_progress(&self) -> u8 {
        progress_percent(
            self.goal_type,
            self.starting_value,
            self.current_value,
            self.target_value,
        )
    }

    /// Recompute and store `progress`, returning the new value.
    pub fn refresh_progress(&mut self) -> u8 {
        self.progress = self.compute_progress();
        self.progress
    }

    /// Unit to display: the stored one, or the goal type's default.
    pub fn display_unit(&self) -> &str {
        self.unit
            .as_deref()
            .unwrap_or_else(|| self.goal_type.default_unit())
    }
}

/// An immutable record of a goal that reached 100%.
///
/// `#[serde(flatten)]` inlines the goal's fields next to `completedAt`, so
/// an achievement reads as "the goal, plus when it was completed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    #[serde(flatten)]
    pub goal: Goal,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub completed_at: DateTime<Utc>,
}

impl Achievement {
    /// Freeze a completed goal. Progress is pinned to 100.
    pub fn from_goal(mut goal: Goal, completed_at: DateTime<Utc>) -> Self {
        goal.progress = 100;
        goal.extra.remove("completedAt");
        Self { goal, completed_at }
    }

    pub fn id(&self) -> RecordId {
        self.goal.id
    }
}

/// Raw input for creating a goal, as collected from a form or CLI flags.
///
/// Numeric fields stay strings here; the engine owns the parsing and
/// defaulting policy so there is exactly one place it lives.
#[derive(Debug, Clone, Default)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub goal_type: Option<String>,
    pub target_value: Option<String>,
    pub current_value: Option<String>,
    pub starting_value: Option<String>,
    pub target_date: Option<String>,
    pub unit: Option<String>,
}

impl NewGoal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// The profile blob: personal details plus the active goals.
///
/// Keys this type doesn't know about are captured in `extra` and written
/// back untouched, so nothing another client stored is lost on rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<i64>,

    /// Body weight in kg.
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,

    /// Height in cm.
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_weight: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub daily_steps: Option<i64>,

    /// Active goals, in insertion order. A goal that doesn't decode is
    /// dropped on its own; the rest of the profile still loads.
    #[serde(default, deserialize_with = "lenient_records")]
    pub goals: Vec<Goal>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Daily step target shown when the profile doesn't set one.
pub const DEFAULT_DAILY_STEPS: i64 = 10_000;

impl Profile {
    pub fn daily_steps_or_default(&self) -> i64 {
        self.daily_steps.unwrap_or(DEFAULT_DAILY_STEPS)
    }
}

/// Replacement personal details for [`Profile`]. Goals are not touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDetails {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub target_weight: Option<f64>,
    pub daily_steps: Option<i64>,
}

// journal.rs — ActivityJournal: the workout and meal logs.
//
// Workouts and meals are append-mostly lists, each stored as one JSON array
// under its own key. Like the goal engine, the journal hydrates once and
// builds each change on a copy of the collection. The copy is written back
// whole and only adopted once the write succeeded; the event goes out last.
// Stored records are decoded one at a time, so a single bad entry (a
// missing date, say) never empties the log.

use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use fit_goal::events::{FitEvent, Notifier};
use fit_goal::parse::{
    lenient_date, lenient_i64, lenient_opt_f64, lenient_opt_i64, parse_integer, parse_optional,
};
use fit_goal::store::{load_records, save_json, MEALS_KEY, WORKOUTS_KEY};
use fit_goal::{next_record_id, KeyValueStore, RecordId};

use crate::error::JournalError;

/// How hard a workout was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }

    /// Parse case-insensitively; `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Intensity::Low),
            "medium" => Some(Intensity::Medium),
            "high" => Some(Intensity::High),
            _ => None,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored blobs may hold "High" or garbage; fall back rather than fail.
impl<'de> Deserialize<'de> for Intensity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(Intensity::parse)
            .unwrap_or_default())
    }
}

/// A logged workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: RecordId,

    /// Free text ("Running", "Yoga", ...).
    #[serde(default)]
    pub activity_type: String,

    /// Minutes.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub duration: i64,

    #[serde(default)]
    pub intensity: Intensity,

    /// Missing or unreadable in a stored blob → 1970-01-01.
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: NaiveDate,

    #[serde(default)]
    pub notes: String,

    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub calories_burned: Option<i64>,
}

/// A logged meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: RecordId,

    /// Free text ("Breakfast", "Snack", ...).
    #[serde(default)]
    pub meal_type: String,

    #[serde(default)]
    pub food_items: Vec<String>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub calories: i64,

    #[serde(default, deserialize_with = "lenient_date")]
    pub date: NaiveDate,

    /// Grams of protein.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub proteins: Option<f64>,

    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub carbs: Option<f64>,

    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub fats: Option<f64>,
}

/// Raw input for logging a workout.
#[derive(Debug, Clone, Default)]
pub struct NewWorkout {
    pub activity_type: String,
    pub duration: String,
    pub intensity: String,
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
    pub notes: String,
    pub calories_burned: Option<String>,
}

/// Raw input for logging a meal.
#[derive(Debug, Clone, Default)]
pub struct NewMeal {
    pub meal_type: String,
    pub food_items: Vec<String>,
    pub calories: String,
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
    pub proteins: Option<String>,
    pub carbs: Option<String>,
    pub fats: Option<String>,
}

/// The workout and meal logs for one profile.
pub struct ActivityJournal<S: KeyValueStore> {
    store: S,
    workouts: Vec<Workout>,
    meals: Vec<Meal>,
    notifier: Notifier,
    high_water: RecordId,
}

impl<S: KeyValueStore> ActivityJournal<S> {
    /// Hydrate both logs. Absent or malformed blobs start empty.
    pub fn load(store: S) -> Self {
        let workouts: Vec<Workout> = load_records(&store, WORKOUTS_KEY);
        let meals: Vec<Meal> = load_records(&store, MEALS_KEY);
        let high_water = workouts
            .iter()
            .map(|w| w.id)
            .chain(meals.iter().map(|m| m.id))
            .max()
            .unwrap_or(0);

        tracing::debug!(
            workouts = workouts.len(),
            meals = meals.len(),
            "activity journal hydrated"
        );

        Self {
            store,
            workouts,
            meals,
            notifier: Notifier::new(),
            high_water,
        }
    }

    /// Publish journal events through `notifier`.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Workouts, in the order they were logged.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// Meals, in the order they were logged.
    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Log a workout. Activity, a positive duration and an intensity are
    /// required; calories burned are optional and dropped if unparsable.
    pub fn add_workout(&mut self, input: NewWorkout) -> Result<Workout, JournalError> {
        let activity_type = input.activity_type.trim().to_string();
        if activity_type.is_empty() {
            return Err(JournalError::invalid("activity type", "must not be empty"));
        }
        let duration = parse_integer(&input.duration)
            .filter(|d| *d > 0)
            .ok_or_else(|| {
                JournalError::invalid(
                    "duration",
                    format!("expected minutes, got \"{}\"", input.duration),
                )
            })?;
        let intensity = Intensity::parse(&input.intensity).ok_or_else(|| {
            JournalError::invalid(
                "intensity",
                format!("expected low, medium or high, got \"{}\"", input.intensity),
            )
        })?;

        let workout = Workout {
            id: next_record_id(&mut self.high_water),
            activity_type,
            duration,
            intensity,
            date: input.date.unwrap_or_else(today),
            notes: input.notes.trim().to_string(),
            calories_burned: input.calories_burned.as_deref().and_then(parse_integer),
        };

        let mut workouts = self.workouts.clone();
        workouts.push(workout.clone());
        self.commit_workouts(workouts)?;

        tracing::debug!(workout_id = workout.id, "workout logged");
        self.notifier.publish(&FitEvent::WorkoutLogged {
            workout_id: workout.id,
            activity_type: workout.activity_type.clone(),
            duration_minutes: workout.duration,
            timestamp: Utc::now(),
        });
        Ok(workout)
    }

    /// Log a meal. A meal type, at least one non-blank food item and a
    /// calorie count are required; macros are optional.
    pub fn add_meal(&mut self, input: NewMeal) -> Result<Meal, JournalError> {
        let meal_type = input.meal_type.trim().to_string();
        if meal_type.is_empty() {
            return Err(JournalError::invalid("meal type", "must not be empty"));
        }
        let food_items: Vec<String> = input
            .food_items
            .iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        if food_items.is_empty() {
            return Err(JournalError::invalid(
                "food items",
                "at least one food item is required",
            ));
        }
        let calories = parse_integer(&input.calories).ok_or_else(|| {
            JournalError::invalid(
                "calories",
                format!("expected a number, got \"{}\"", input.calories),
            )
        })?;

        let meal = Meal {
            id: next_record_id(&mut self.high_water),
            meal_type,
            food_items,
            calories,
            date: input.date.unwrap_or_else(today),
            proteins: parse_optional(input.proteins.as_deref()),
            carbs: parse_optional(input.carbs.as_deref()),
            fats: parse_optional(input.fats.as_deref()),
        };

        let mut meals = self.meals.clone();
        meals.push(meal.clone());
        self.commit_meals(meals)?;

        tracing::debug!(meal_id = meal.id, "meal logged");
        self.notifier.publish(&FitEvent::MealLogged {
            meal_id: meal.id,
            meal_type: meal.meal_type.clone(),
            calories: meal.calories,
            timestamp: Utc::now(),
        });
        Ok(meal)
    }

    /// Remove a workout. Returns whether anything was removed.
    pub fn remove_workout(&mut self, workout_id: RecordId) -> Result<bool, JournalError> {
        if !self.workouts.iter().any(|w| w.id == workout_id) {
            return Ok(false);
        }
        let remaining = self
            .workouts
            .iter()
            .filter(|w| w.id != workout_id)
            .cloned()
            .collect();
        self.commit_workouts(remaining)?;
        Ok(true)
    }

    /// Remove a meal. Returns whether anything was removed.
    pub fn remove_meal(&mut self, meal_id: RecordId) -> Result<bool, JournalError> {
        if !self.meals.iter().any(|m| m.id == meal_id) {
            return Ok(false);
        }
        let remaining = self
            .meals
            .iter()
            .filter(|m| m.id != meal_id)
            .cloned()
            .collect();
        self.commit_meals(remaining)?;
        Ok(true)
    }

    /// Write `workouts` and adopt them only once the write succeeded.
    fn commit_workouts(&mut self, workouts: Vec<Workout>) -> Result<(), JournalError> {
        save_json(&mut self.store, WORKOUTS_KEY, &workouts)?;
        self.workouts = workouts;
        Ok(())
    }

    fn commit_meals(&mut self, meals: Vec<Meal>) -> Result<(), JournalError> {
        save_json(&mut self.store, MEALS_KEY, &meals)?;
        self.meals = meals;
        Ok(())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

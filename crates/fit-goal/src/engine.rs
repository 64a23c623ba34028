// engine.rs — GoalEngine: owns the active goals and achievements.
//
// The engine is the only path by which goals are created, progressed,
// completed or removed. Every mutation builds the new collection, writes it
// to the injected KeyValueStore, and only then adopts it; a failed write
// leaves the engine exactly as it was. Events go out last.
//
// The completion transition:
//
//   update_goal_progress(id, value)
//     → progress < 100  : goal updated in place (order preserved)
//     → progress ≥ 100  : goal appended to the achievements (written first),
//                         then removed from the active list (written second)
//
// Bad numeric input never fails an operation; it falls back to defaults.
// Unknown ids are silent no-ops.

use chrono::Utc;

use crate::error::GoalError;
use crate::events::{FitEvent, Notifier};
use crate::goal::{
    next_record_id, Achievement, Goal, GoalType, NewGoal, Profile, ProfileDetails, RecordId,
};
use crate::parse::{parse_number, parse_optional};
use crate::store::{
    load_or_default, load_records, save_json, KeyValueStore, ACHIEVEMENTS_KEY, PROFILE_KEY,
};

/// Default current value when the input doesn't parse.
pub const DEFAULT_CURRENT_VALUE: f64 = 0.0;
/// Default target value when the input doesn't parse.
pub const DEFAULT_TARGET_VALUE: f64 = 1.0;

/// Behaviour switches for the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Reject nonsensical goals at creation instead of accepting them and
    /// letting the progress function pin them at 0.
    pub strict: bool,
}

/// What a progress update did.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// No active goal has that id. Nothing changed.
    NotFound,
    /// The goal stays active with the new progress.
    Updated { goal_id: RecordId, progress: u8 },
    /// The goal reached 100% and moved to the achievements.
    Completed(Achievement),
}

/// The goal engine for one profile.
///
/// Generic over the store so tests can run against `MemoryStore` and the
/// CLI against `FileStore` with the same code.
pub struct GoalEngine<S: KeyValueStore> {
    store: S,
    profile: Profile,
    achievements: Vec<Achievement>,
    options: EngineOptions,
    notifier: Notifier,
    /// Highest id seen or issued; new ids are always above it.
    high_water: RecordId,
}

impl<S: KeyValueStore> GoalEngine<S> {
    /// Hydrate the engine from `store` with default (permissive) options.
    ///
    /// Absent or malformed blobs start as empty collections.
    pub fn load(store: S) -> Self {
        Self::load_with_options(store, EngineOptions::default())
    }

    pub fn load_with_options(store: S, options: EngineOptions) -> Self {
        let profile: Profile = load_or_default(&store, PROFILE_KEY);
        let achievements: Vec<Achievement> = load_records(&store, ACHIEVEMENTS_KEY);

        let high_water = profile
            .goals
            .iter()
            .map(|g| g.id)
            .chain(achievements.iter().map(Achievement::id))
            .max()
            .unwrap_or(0);

        tracing::debug!(
            goals = profile.goals.len(),
            achievements = achievements.len(),
            "goal engine hydrated"
        );

        Self {
            store,
            profile,
            achievements,
            options,
            notifier: Notifier::new(),
            high_water,
        }
    }

    /// Publish lifecycle events through `notifier`.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Active goals, in insertion order.
    pub fn active_goals(&self) -> &[Goal] {
        &self.profile.goals
    }

    /// Achievements, in completion order.
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Look up an active goal by id.
    pub fn goal(&self, goal_id: RecordId) -> Option<&Goal> {
        self.profile.goals.iter().find(|g| g.id == goal_id)
    }

    /// Progress for any goal-shaped record, without touching engine state.
    pub fn compute_progress(&self, goal: &Goal) -> u8 {
        goal.compute_progress()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Create a goal from raw input and append it to the active collection.
    ///
    /// Defaults for inputs that don't parse to a finite number:
    /// current → 0, target → 1, starting → current (if it parsed) else 0.
    /// An omitted or unknown goal type becomes `increase`.
    ///
    /// In strict mode, returns `GoalError::InvalidGoal` for goals that can
    /// never make progress; nothing is stored in that case.
    pub fn create_goal(&mut self, input: NewGoal) -> Result<Goal, GoalError> {
        let parsed_current = parse_optional(input.current_value.as_deref());
        let target_value =
            parse_optional(input.target_value.as_deref()).unwrap_or(DEFAULT_TARGET_VALUE);
        let starting_value = parse_optional(input.starting_value.as_deref())
            .or(parsed_current)
            .unwrap_or(DEFAULT_CURRENT_VALUE);
        let current_value = parsed_current.unwrap_or(DEFAULT_CURRENT_VALUE);
        let goal_type = input
            .goal_type
            .as_deref()
            .map(GoalType::parse_lenient)
            .unwrap_or_default();

        if self.options.strict {
            validate_strict(&input.title, goal_type, starting_value, target_value)?;
        }

        let mut goal = Goal {
            id: next_record_id(&mut self.high_water),
            title: input.title,
            description: input.description,
            goal_type,
            unit: non_blank(input.unit),
            starting_value,
            current_value,
            target_value,
            target_date: non_blank(input.target_date),
            progress: 0,
            created_at: Utc::now(),
            extra: Default::default(),
        };
        goal.refresh_progress();

        let mut profile = self.profile.clone();
        profile.goals.push(goal.clone());
        self.commit_profile(profile)?;

        tracing::debug!(goal_id = goal.id, progress = goal.progress, "goal created");
        self.notifier.publish(&FitEvent::goal_created(&goal));
        Ok(goal)
    }

    /// Set a goal's current value from raw input and apply the completion
    /// transition if it reaches 100%.
    ///
    /// Input that doesn't parse counts as 0.
    pub fn update_goal_progress(
        &mut self,
        goal_id: RecordId,
        raw_value: &str,
    ) -> Result<ProgressUpdate, GoalError> {
        let value = parse_number(raw_value).unwrap_or(DEFAULT_CURRENT_VALUE);
        self.set_current_value(goal_id, value)
    }

    /// Typed variant of [`update_goal_progress`](Self::update_goal_progress).
    pub fn set_current_value(
        &mut self,
        goal_id: RecordId,
        value: f64,
    ) -> Result<ProgressUpdate, GoalError> {
        let Some(index) = self.profile.goals.iter().position(|g| g.id == goal_id) else {
            tracing::debug!(goal_id, "progress update for unknown goal ignored");
            return Ok(ProgressUpdate::NotFound);
        };

        let mut goal = self.profile.goals[index].clone();
        goal.current_value = value;
        let progress = goal.refresh_progress();

        if progress < 100 {
            let event = FitEvent::goal_progress_updated(&goal);
            let mut profile = self.profile.clone();
            profile.goals[index] = goal;
            self.commit_profile(profile)?;
            self.notifier.publish(&event);
            return Ok(ProgressUpdate::Updated { goal_id, progress });
        }

        // Achievements are written before the profile. If the second write
        // fails the goal sits in both collections, never in neither, and a
        // retry replaces the achievement instead of duplicating it.
        let achievement = Achievement::from_goal(goal, Utc::now());
        let mut achievements = self.achievements.clone();
        match achievements.iter_mut().find(|a| a.id() == goal_id) {
            Some(existing) => *existing = achievement.clone(),
            None => achievements.push(achievement.clone()),
        }
        self.commit_achievements(achievements)?;

        let mut profile = self.profile.clone();
        profile.goals.remove(index);
        self.commit_profile(profile)?;

        tracing::info!(goal_id, title = %achievement.goal.title, "goal completed");
        self.notifier.publish(&FitEvent::goal_completed(&achievement));
        Ok(ProgressUpdate::Completed(achievement))
    }

    /// Remove an active goal. Returns whether anything was removed.
    pub fn remove_goal(&mut self, goal_id: RecordId) -> Result<bool, GoalError> {
        if self.goal(goal_id).is_none() {
            return Ok(false);
        }

        let mut profile = self.profile.clone();
        profile.goals.retain(|g| g.id != goal_id);
        self.commit_profile(profile)?;

        self.notifier.publish(&FitEvent::GoalRemoved {
            goal_id,
            timestamp: Utc::now(),
        });
        Ok(true)
    }

    /// Remove one achievement. Returns whether anything was removed.
    pub fn remove_achievement(&mut self, achievement_id: RecordId) -> Result<bool, GoalError> {
        if !self.achievements.iter().any(|a| a.id() == achievement_id) {
            return Ok(false);
        }

        let remaining = self
            .achievements
            .iter()
            .filter(|a| a.id() != achievement_id)
            .cloned()
            .collect();
        self.commit_achievements(remaining)?;

        self.notifier.publish(&FitEvent::AchievementRemoved {
            achievement_id,
            timestamp: Utc::now(),
        });
        Ok(true)
    }

    /// Empty the achievements list. Returns how many were removed.
    pub fn clear_achievements(&mut self) -> Result<usize, GoalError> {
        let count = self.achievements.len();
        self.commit_achievements(Vec::new())?;
        self.notifier.publish(&FitEvent::AchievementsCleared {
            count,
            timestamp: Utc::now(),
        });
        Ok(count)
    }

    /// Replace the profile's personal details, keeping its goals.
    pub fn update_profile(&mut self, details: ProfileDetails) -> Result<(), GoalError> {
        let mut profile = self.profile.clone();
        profile.name = details.name;
        profile.age = details.age;
        profile.weight = details.weight;
        profile.height = details.height;
        profile.target_weight = details.target_weight;
        profile.daily_steps = details.daily_steps;
        self.commit_profile(profile)
    }

    /// Write `profile` and adopt it only once the write succeeded.
    fn commit_profile(&mut self, profile: Profile) -> Result<(), GoalError> {
        save_json(&mut self.store, PROFILE_KEY, &profile)?;
        self.profile = profile;
        Ok(())
    }

    fn commit_achievements(&mut self, achievements: Vec<Achievement>) -> Result<(), GoalError> {
        save_json(&mut self.store, ACHIEVEMENTS_KEY, &achievements)?;
        self.achievements = achievements;
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Strict-mode check: reject goals the progress function can only ever
/// report as 0%.
fn validate_strict(
    title: &str,
    goal_type: GoalType,
    starting: f64,
    target: f64,
) -> Result<(), GoalError> {
    let reason = match goal_type {
        GoalType::WeightLoss if target >= starting => {
            Some("weight-loss target must be below the starting value")
        }
        GoalType::WeightGain if target <= starting => {
            Some("weight-gain target must be above the starting value")
        }
        t if !t.is_weight() && target <= 0.0 => Some("target must be greater than zero"),
        _ => None,
    };

    match reason {
        Some(reason) => Err(GoalError::InvalidGoal {
            title: title.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

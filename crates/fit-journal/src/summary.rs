// summary.rs — Dashboard, progress and achievement statistics.
//
// Every function here is pure: it takes the logs (and a reference date) and
// returns plain numbers. Nothing reads the clock, so callers decide what
// "today" is and tests can pin it.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;

use fit_goal::{Achievement, GoalType};

use crate::journal::{Meal, Workout};

/// Workouts per week the dashboard measures against when nothing is configured.
pub const DEFAULT_WEEKLY_WORKOUT_TARGET: u32 = 5;

/// Number of entries the recent-activity feed shows.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Distinct logged dates the progress charts show once the log has data.
pub const RECENT_DATE_LIMIT: usize = 10;

/// The headline numbers on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub workouts_this_week: usize,
    pub calories_today: i64,
    /// `workouts_this_week / weekly_target` as a percentage. Not capped, so
    /// a busy week reads above 100.
    pub weekly_progress: u32,
    pub weekly_target: u32,
    /// Minutes across every logged workout, not just this week.
    pub total_active_minutes: i64,
}

/// The Sunday that starts the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    let back = u64::from(day.weekday().num_days_from_sunday());
    day.checked_sub_days(Days::new(back)).unwrap_or(day)
}

pub fn dashboard(
    workouts: &[Workout],
    meals: &[Meal],
    today: NaiveDate,
    weekly_target: u32,
) -> Dashboard {
    let start = week_start(today);
    let workouts_this_week = workouts.iter().filter(|w| w.date >= start).count();
    let calories_today = meals
        .iter()
        .filter(|m| m.date == today)
        .map(|m| m.calories)
        .sum();
    let weekly_progress = if weekly_target == 0 {
        0
    } else {
        (workouts_this_week as f64 / f64::from(weekly_target) * 100.0).round() as u32
    };

    Dashboard {
        workouts_this_week,
        calories_today,
        weekly_progress,
        weekly_target,
        total_active_minutes: workouts.iter().map(|w| w.duration).sum(),
    }
}

/// The `days` dates ending at `today`, oldest first.
fn trailing_days(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..u64::from(days))
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// Workouts logged on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub workouts: usize,
}

/// One entry per day for the `days` days ending at `today`, oldest first.
/// Days without workouts are present with a count of zero.
pub fn daily_workout_counts(workouts: &[Workout], today: NaiveDate, days: u32) -> Vec<DailyCount> {
    trailing_days(today, days)
        .into_iter()
        .map(|date| count_on(workouts, date))
        .collect()
}

/// Counts for the last `limit` distinct dates that have a workout, oldest
/// first. Empty when no workout is logged.
pub fn recent_workout_counts(workouts: &[Workout], limit: usize) -> Vec<DailyCount> {
    last_distinct(workouts.iter().map(|w| w.date), limit)
        .into_iter()
        .map(|date| count_on(workouts, date))
        .collect()
}

fn count_on(workouts: &[Workout], date: NaiveDate) -> DailyCount {
    DailyCount {
        date,
        workouts: workouts.iter().filter(|w| w.date == date).count(),
    }
}

/// The newest `limit` distinct dates, oldest first.
fn last_distinct(dates: impl Iterator<Item = NaiveDate>, limit: usize) -> Vec<NaiveDate> {
    let unique: BTreeSet<NaiveDate> = dates.collect();
    let skip = unique.len().saturating_sub(limit);
    unique.into_iter().skip(skip).collect()
}

/// Calories eaten versus burned on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalorieBalance {
    pub date: NaiveDate,
    pub consumed: i64,
    pub burned: i64,
}

impl CalorieBalance {
    pub fn net(&self) -> i64 {
        self.consumed - self.burned
    }
}

/// Consumed and burned calories per day for the `days` days ending at
/// `today`, oldest first. Workouts without a calorie figure burn nothing.
pub fn daily_calorie_balance(
    workouts: &[Workout],
    meals: &[Meal],
    today: NaiveDate,
    days: u32,
) -> Vec<CalorieBalance> {
    trailing_days(today, days)
        .into_iter()
        .map(|date| balance_on(workouts, meals, date))
        .collect()
}

/// Balance for the last `limit` distinct dates with a workout or a meal,
/// oldest first. Empty when both logs are.
pub fn recent_calorie_balance(
    workouts: &[Workout],
    meals: &[Meal],
    limit: usize,
) -> Vec<CalorieBalance> {
    let dates = workouts.iter().map(|w| w.date).chain(meals.iter().map(|m| m.date));
    last_distinct(dates, limit)
        .into_iter()
        .map(|date| balance_on(workouts, meals, date))
        .collect()
}

fn balance_on(workouts: &[Workout], meals: &[Meal], date: NaiveDate) -> CalorieBalance {
    CalorieBalance {
        date,
        consumed: meals
            .iter()
            .filter(|m| m.date == date)
            .map(|m| m.calories)
            .sum(),
        burned: workouts
            .iter()
            .filter(|w| w.date == date)
            .filter_map(|w| w.calories_burned)
            .sum(),
    }
}

/// How often one activity type appears in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityShare {
    pub activity_type: String,
    pub count: usize,
    /// Rounded share of all workouts.
    pub percentage: u32,
}

/// Counts per activity type, each activity type in first-seen order.
fn activity_counts(workouts: &[Workout]) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for workout in workouts {
        match counts
            .iter_mut()
            .find(|(name, _)| *name == workout.activity_type)
        {
            Some((_, n)) => *n += 1,
            None => counts.push((workout.activity_type.as_str(), 1)),
        }
    }
    counts
}

/// Share of each activity type, most frequent first, ties by name.
pub fn activity_distribution(workouts: &[Workout]) -> Vec<ActivityShare> {
    let total = workouts.len();
    let mut shares: Vec<ActivityShare> = activity_counts(workouts)
        .into_iter()
        .map(|(name, count)| ActivityShare {
            activity_type: name.to_string(),
            count,
            percentage: (count as f64 / total as f64 * 100.0).round() as u32,
        })
        .collect();
    shares.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.activity_type.cmp(&b.activity_type))
    });
    shares
}

/// Lifetime totals shown under the progress charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_workouts: usize,
    pub total_active_minutes: i64,
    /// Rounded mean workout length in minutes; 0 with no workouts.
    pub average_duration: i64,
    pub total_calories_burned: i64,
    pub total_calories_consumed: i64,
    /// Ties go to the activity type seen last in the log.
    pub most_frequent_activity: Option<String>,
}

pub fn progress_summary(workouts: &[Workout], meals: &[Meal]) -> ProgressSummary {
    let total_active_minutes: i64 = workouts.iter().map(|w| w.duration).sum();
    let average_duration = if workouts.is_empty() {
        0
    } else {
        (total_active_minutes as f64 / workouts.len() as f64).round() as i64
    };

    ProgressSummary {
        total_workouts: workouts.len(),
        total_active_minutes,
        average_duration,
        total_calories_burned: workouts.iter().filter_map(|w| w.calories_burned).sum(),
        total_calories_consumed: meals.iter().map(|m| m.calories).sum(),
        most_frequent_activity: activity_counts(workouts)
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map(|(name, _)| name.to_string()),
    }
}

/// The `limit` most recent workouts, returned oldest first for a timeline.
pub fn recent_workouts(workouts: &[Workout], limit: usize) -> Vec<&Workout> {
    let mut sorted: Vec<&Workout> = workouts.iter().collect();
    // Stable sort keeps log order within a day.
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted.reverse();
    sorted
}

/// One line of the combined workout and meal feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity<'a> {
    Workout(&'a Workout),
    Meal(&'a Meal),
}

impl Activity<'_> {
    pub fn date(&self) -> NaiveDate {
        match self {
            Activity::Workout(w) => w.date,
            Activity::Meal(m) => m.date,
        }
    }
}

impl fmt::Display for Activity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activity::Workout(w) => write!(f, "{} for {} minutes", w.activity_type, w.duration),
            Activity::Meal(m) => write!(f, "{} - {} calories", m.meal_type, m.calories),
        }
    }
}

/// Workouts and meals merged, newest date first, capped at `limit`.
/// Within a date, workouts come before meals.
pub fn recent_activities<'a>(
    workouts: &'a [Workout],
    meals: &'a [Meal],
    limit: usize,
) -> Vec<Activity<'a>> {
    let mut feed: Vec<Activity<'a>> = workouts
        .iter()
        .map(Activity::Workout)
        .chain(meals.iter().map(Activity::Meal))
        .collect();
    feed.sort_by(|a, b| b.date().cmp(&a.date()));
    feed.truncate(limit);
    feed
}

/// Figures for the achievements page header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementStats {
    pub total: usize,
    /// Completed in the same calendar month (UTC) as `now`.
    pub this_month: usize,
    /// Ties go to the goal type that first appears later in the list.
    pub most_common: GoalType,
}

/// `None` when there are no achievements yet.
pub fn achievement_stats(achievements: &[Achievement], now: DateTime<Utc>) -> Option<AchievementStats> {
    let this_month = achievements
        .iter()
        .filter(|a| {
            a.completed_at.year() == now.year() && a.completed_at.month() == now.month()
        })
        .count();

    let mut order: Vec<GoalType> = Vec::new();
    let mut counts: HashMap<GoalType, usize> = HashMap::new();
    for achievement in achievements {
        let goal_type = achievement.goal.goal_type;
        let n = counts.entry(goal_type).or_insert(0);
        if *n == 0 {
            order.push(goal_type);
        }
        *n += 1;
    }

    let most_common = order
        .into_iter()
        .max_by_key(|t| counts.get(t).copied().unwrap_or(0))?;

    Some(AchievementStats {
        total: achievements.len(),
        this_month,
        most_common,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Intensity;
    use chrono::TimeZone;
    use fit_goal::Goal;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn workout(id: u64, activity: &str, day: &str, minutes: i64, burned: Option<i64>) -> Workout {
        Workout {
            id,
            activity_type: activity.to_string(),
            duration: minutes,
            intensity: Intensity::Medium,
            date: date(day),
            notes: String::new(),
            calories_burned: burned,
        }
    }

    fn meal(id: u64, day: &str, calories: i64) -> Meal {
        Meal {
            id,
            meal_type: "lunch".to_string(),
            food_items: vec!["Salad".to_string()],
            calories,
            date: date(day),
            proteins: None,
            carbs: None,
            fats: None,
        }
    }

    fn achievement(id: u64, goal_type: GoalType, completed: DateTime<Utc>) -> Achievement {
        let goal: Goal = serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("goal {}", id),
            "goalType": goal_type.as_str(),
            "currentValue": 1,
            "targetValue": 1,
            "createdAt": "2025-01-01T00:00:00Z",
        }))
        .unwrap();
        Achievement::from_goal(goal, completed)
    }

    fn log() -> (Vec<Workout>, Vec<Meal>) {
        // 2025-01-15 is a Wednesday; its week starts Sunday 2025-01-12.
        let workouts = vec![
            workout(1, "Running", "2025-01-15", 30, Some(320)),
            workout(2, "Yoga", "2025-01-13", 60, None),
            workout(3, "Running", "2025-01-11", 45, Some(450)),
            workout(4, "Cycling", "2025-01-12", 40, Some(300)),
        ];
        let meals = vec![
            meal(101, "2025-01-15", 380),
            meal(102, "2025-01-15", 520),
            meal(103, "2025-01-14", 650),
        ];
        (workouts, meals)
    }

    #[test]
    fn week_starts_on_sunday() {
        assert_eq!(week_start(date("2025-01-15")), date("2025-01-12"));
        assert_eq!(week_start(date("2025-01-12")), date("2025-01-12"));
        assert_eq!(week_start(date("2025-01-11")), date("2025-01-05"));
    }

    #[test]
    fn dashboard_numbers() {
        let (workouts, meals) = log();
        let d = dashboard(&workouts, &meals, date("2025-01-15"), DEFAULT_WEEKLY_WORKOUT_TARGET);

        assert_eq!(d.workouts_this_week, 3);
        assert_eq!(d.calories_today, 900);
        assert_eq!(d.weekly_progress, 60);
        assert_eq!(d.total_active_minutes, 175);
    }

    #[test]
    fn weekly_progress_is_not_capped() {
        let (workouts, meals) = log();
        let d = dashboard(&workouts, &meals, date("2025-01-15"), 2);
        assert_eq!(d.weekly_progress, 150);

        let d = dashboard(&workouts, &meals, date("2025-01-15"), 0);
        assert_eq!(d.weekly_progress, 0);
    }

    #[test]
    fn daily_counts_cover_every_day() {
        let (workouts, _) = log();
        let counts = daily_workout_counts(&workouts, date("2025-01-15"), 5);

        assert_eq!(counts.len(), 5);
        assert_eq!(counts[0].date, date("2025-01-11"));
        assert_eq!(counts[4].date, date("2025-01-15"));
        let per_day: Vec<usize> = counts.iter().map(|c| c.workouts).collect();
        assert_eq!(per_day, vec![1, 1, 1, 0, 1]);
    }

    #[test]
    fn calorie_balance_per_day() {
        let (workouts, meals) = log();
        let balance = daily_calorie_balance(&workouts, &meals, date("2025-01-15"), 3);

        assert_eq!(
            balance,
            vec![
                CalorieBalance { date: date("2025-01-13"), consumed: 0, burned: 0 },
                CalorieBalance { date: date("2025-01-14"), consumed: 650, burned: 0 },
                CalorieBalance { date: date("2025-01-15"), consumed: 900, burned: 320 },
            ]
        );
        assert_eq!(balance[2].net(), 580);
    }

    #[test]
    fn recent_counts_use_dates_with_workouts() {
        let (mut workouts, _) = log();
        workouts.push(workout(5, "Running", "2025-01-15", 20, None));
        workouts.push(workout(6, "Yoga", "2024-12-01", 30, None));

        let counts = recent_workout_counts(&workouts, 3);
        assert_eq!(
            counts,
            vec![
                DailyCount { date: date("2025-01-12"), workouts: 1 },
                DailyCount { date: date("2025-01-13"), workouts: 1 },
                DailyCount { date: date("2025-01-15"), workouts: 2 },
            ]
        );

        // Fewer dates than the limit: all of them, oldest first.
        let counts = recent_workout_counts(&workouts, RECENT_DATE_LIMIT);
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[0].date, date("2024-12-01"));
        assert!(recent_workout_counts(&[], RECENT_DATE_LIMIT).is_empty());
    }

    #[test]
    fn recent_balance_joins_workout_and_meal_dates() {
        let (workouts, meals) = log();
        let balance = recent_calorie_balance(&workouts, &meals, 3);

        // 2025-01-14 has only a meal and still counts as a logged date.
        assert_eq!(
            balance,
            vec![
                CalorieBalance { date: date("2025-01-13"), consumed: 0, burned: 0 },
                CalorieBalance { date: date("2025-01-14"), consumed: 650, burned: 0 },
                CalorieBalance { date: date("2025-01-15"), consumed: 900, burned: 320 },
            ]
        );

        let balance = recent_calorie_balance(&[], &meals, RECENT_DATE_LIMIT);
        assert_eq!(balance.len(), 2);
        assert!(recent_calorie_balance(&[], &[], RECENT_DATE_LIMIT).is_empty());
    }

    #[test]
    fn distribution_sorted_by_count_then_name() {
        let (workouts, _) = log();
        let shares = activity_distribution(&workouts);

        let names: Vec<&str> = shares.iter().map(|s| s.activity_type.as_str()).collect();
        assert_eq!(names, vec!["Running", "Cycling", "Yoga"]);
        assert_eq!(shares[0].count, 2);
        assert_eq!(shares[0].percentage, 50);
        assert_eq!(shares[1].percentage, 25);

        assert!(activity_distribution(&[]).is_empty());
    }

    #[test]
    fn progress_totals() {
        let (workouts, meals) = log();
        let summary = progress_summary(&workouts, &meals);

        assert_eq!(summary.total_workouts, 4);
        assert_eq!(summary.total_active_minutes, 175);
        assert_eq!(summary.average_duration, 44);
        assert_eq!(summary.total_calories_burned, 1070);
        assert_eq!(summary.total_calories_consumed, 1550);
        assert_eq!(summary.most_frequent_activity.as_deref(), Some("Running"));

        let empty = progress_summary(&[], &[]);
        assert_eq!(empty.average_duration, 0);
        assert_eq!(empty.most_frequent_activity, None);
    }

    #[test]
    fn most_frequent_tie_goes_to_later_activity() {
        let workouts = vec![
            workout(1, "Yoga", "2025-01-10", 30, None),
            workout(2, "Running", "2025-01-11", 30, None),
        ];
        let summary = progress_summary(&workouts, &[]);
        assert_eq!(summary.most_frequent_activity.as_deref(), Some("Running"));
    }

    #[test]
    fn recent_workouts_are_chronological() {
        let (workouts, _) = log();
        let recent = recent_workouts(&workouts, 3);
        let ids: Vec<u64> = recent.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn recent_activity_feed() {
        let (workouts, meals) = log();
        let feed = recent_activities(&workouts, &meals, 4);

        assert_eq!(feed.len(), 4);
        assert_eq!(feed[0].to_string(), "Running for 30 minutes");
        assert_eq!(feed[1].to_string(), "lunch - 380 calories");
        assert_eq!(feed[3].date(), date("2025-01-14"));
    }

    #[test]
    fn achievement_stats_counts_month_and_type() {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
        let achievements = vec![
            achievement(1, GoalType::Workouts, Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).unwrap()),
            achievement(2, GoalType::Distance, Utc.with_ymd_and_hms(2025, 2, 27, 8, 0, 0).unwrap()),
            achievement(3, GoalType::Workouts, Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap()),
        ];

        let stats = achievement_stats(&achievements, now).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.this_month, 1);
        assert_eq!(stats.most_common, GoalType::Workouts);

        assert!(achievement_stats(&[], now).is_none());
    }

    #[test]
    fn achievement_type_tie_goes_to_later_type() {
        let at = Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).unwrap();
        let achievements = vec![
            achievement(1, GoalType::Distance, at),
            achievement(2, GoalType::WeightLoss, at),
        ];
        let stats = achievement_stats(&achievements, at).unwrap();
        assert_eq!(stats.most_common, GoalType::WeightLoss);
    }
}

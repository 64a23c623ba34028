// dashboard.rs — `fit dashboard` and `fit progress`.

use chrono::Utc;
use fit_journal::summary::{
    activity_distribution, daily_calorie_balance, daily_workout_counts, dashboard,
    progress_summary, recent_activities, recent_calorie_balance, recent_workout_counts,
    recent_workouts, Activity, CalorieBalance, RECENT_ACTIVITY_LIMIT, RECENT_DATE_LIMIT,
};

use super::{format_value, open_engine, open_journal, progress_bar, truncate};
use crate::config::FitConfig;

/// Workouts shown in the progress timeline.
const TIMELINE_LIMIT: usize = 8;

pub fn show_dashboard(config: &FitConfig) -> anyhow::Result<()> {
    let engine = open_engine(config)?;
    let journal = open_journal(config)?;
    let today = Utc::now().date_naive();

    let stats = dashboard(
        journal.workouts(),
        journal.meals(),
        today,
        config.settings.dashboard.weekly_workout_target,
    );

    if let Some(name) = &engine.profile().name {
        println!("Welcome back, {}!", name);
        println!();
    }
    println!("Workouts this week: {}", stats.workouts_this_week);
    println!("Calories today:     {}", stats.calories_today);
    println!(
        "Weekly progress:    {}% of {} workouts",
        stats.weekly_progress, stats.weekly_target
    );
    println!("Active minutes:     {}", stats.total_active_minutes);

    println!("\nRecent activities");
    println!("{}", "-".repeat(60));
    let feed = recent_activities(journal.workouts(), journal.meals(), RECENT_ACTIVITY_LIMIT);
    if feed.is_empty() {
        println!("Nothing logged yet.");
    }
    for activity in &feed {
        let kind = match activity {
            Activity::Workout(_) => "workout",
            Activity::Meal(_) => "meal",
        };
        println!("{}  {:<8} {}", activity.date(), kind, activity);
    }

    println!("\nGoals");
    println!("{}", "-".repeat(60));
    let goals = engine.active_goals();
    if goals.is_empty() {
        println!("No active goals.");
    }
    for g in goals {
        println!(
            "{:<28} {} {:>3}%  ({} / {})",
            truncate(&g.title, 26),
            progress_bar(u32::from(g.progress), 20),
            g.progress,
            format_value(g.current_value),
            format_value(g.target_value),
        );
    }

    Ok(())
}

/// `--days` always shows that many trailing days. Without it, a log with
/// data shows its last few logged dates and an empty one the configured
/// trailing window.
pub fn show_progress(config: &FitConfig, days: Option<u32>) -> anyhow::Result<()> {
    let journal = open_journal(config)?;
    let today = Utc::now().date_naive();
    let workouts = journal.workouts();
    let meals = journal.meals();

    let has_data = !workouts.is_empty() || !meals.is_empty();
    match days {
        None if has_data => {
            let counts = recent_workout_counts(workouts, RECENT_DATE_LIMIT);
            let balance = recent_calorie_balance(workouts, meals, RECENT_DATE_LIMIT);

            println!("Workouts on the last {} workout days", counts.len());
            println!("{:<12} {:>9}", "DATE", "WORKOUTS");
            println!("{}", "-".repeat(52));
            if counts.is_empty() {
                println!("No workouts logged yet.");
            }
            for count in &counts {
                println!("{:<12} {:>9}", count.date.to_string(), count.workouts);
            }

            println!("\nCalories on the last {} logged days", balance.len());
            print_balance_header();
            for day in &balance {
                print_balance_row(day);
            }
        }
        _ => {
            let days = days.unwrap_or(config.settings.dashboard.progress_days).max(1);
            let counts = daily_workout_counts(workouts, today, days);
            let balance = daily_calorie_balance(workouts, meals, today, days);

            println!("Last {} days", days);
            println!(
                "{:<12} {:>9} {:>10} {:>8} {:>8}",
                "DATE", "WORKOUTS", "CONSUMED", "BURNED", "NET"
            );
            println!("{}", "-".repeat(52));
            for (count, day) in counts.iter().zip(&balance) {
                println!(
                    "{:<12} {:>9} {:>10} {:>8} {:>8}",
                    count.date.to_string(),
                    count.workouts,
                    day.consumed,
                    day.burned,
                    day.net(),
                );
            }
        }
    }

    let shares = activity_distribution(workouts);
    if !shares.is_empty() {
        println!("\nActivity mix");
        println!("{}", "-".repeat(52));
        for share in &shares {
            println!(
                "{:<20} {:>4}  {} {:>3}%",
                truncate(&share.activity_type, 20),
                share.count,
                progress_bar(share.percentage, 20),
                share.percentage,
            );
        }
    }

    let timeline = recent_workouts(workouts, TIMELINE_LIMIT);
    if !timeline.is_empty() {
        println!("\nRecent workouts");
        println!("{}", "-".repeat(52));
        for w in &timeline {
            println!(
                "{}  {:<16} {:>4} min  {:<6} {:>5} kcal",
                w.date,
                truncate(&w.activity_type, 16),
                w.duration,
                w.intensity.as_str(),
                w.calories_burned.unwrap_or(0),
            );
        }
    }

    let summary = progress_summary(workouts, meals);
    println!("\nTotals");
    println!("{}", "-".repeat(52));
    println!("Workouts:          {}", summary.total_workouts);
    println!("Active minutes:    {}", summary.total_active_minutes);
    println!("Average duration:  {} min", summary.average_duration);
    println!("Calories burned:   {}", summary.total_calories_burned);
    println!("Calories consumed: {}", summary.total_calories_consumed);
    println!(
        "Favorite activity: {}",
        summary.most_frequent_activity.as_deref().unwrap_or("-")
    );

    Ok(())
}

fn print_balance_header() {
    println!("{:<12} {:>10} {:>8} {:>8}", "DATE", "CONSUMED", "BURNED", "NET");
    println!("{}", "-".repeat(52));
}

fn print_balance_row(day: &CalorieBalance) {
    println!(
        "{:<12} {:>10} {:>8} {:>8}",
        day.date.to_string(),
        day.consumed,
        day.burned,
        day.net(),
    );
}

// workout.rs — Workout subcommands: add, list, remove.

use chrono::NaiveDate;
use clap::Subcommand;
use fit_goal::{FileStore, RecordId};
use fit_journal::{ActivityJournal, NewWorkout, Workout};

use super::{open_journal, truncate};
use crate::config::FitConfig;

#[derive(Subcommand)]
pub enum WorkoutCommands {
    /// Log a workout.
    Add {
        /// Activity (e.g., "Running", "Yoga").
        activity: String,
        /// Duration in minutes.
        #[arg(long)]
        duration: String,
        /// low, medium or high.
        #[arg(long, default_value = "medium")]
        intensity: String,
        /// Calories burned.
        #[arg(long)]
        calories: Option<String>,
        /// Date as YYYY-MM-DD (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List workouts, newest first.
    List {
        /// Show at most this many.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Remove a logged workout.
    Remove {
        /// Workout ID.
        id: RecordId,
    },
}

pub fn execute(cmd: &WorkoutCommands, config: &FitConfig) -> anyhow::Result<()> {
    let mut journal = open_journal(config)?;

    match cmd {
        WorkoutCommands::Add {
            activity,
            duration,
            intensity,
            calories,
            date,
            notes,
        } => {
            let workout = journal.add_workout(NewWorkout {
                activity_type: activity.clone(),
                duration: duration.clone(),
                intensity: intensity.clone(),
                date: *date,
                notes: notes.clone(),
                calories_burned: calories.clone(),
            })?;
            println!(
                "Workout logged: {} ({} for {} min on {})",
                workout.id, workout.activity_type, workout.duration, workout.date
            );
            Ok(())
        }
        WorkoutCommands::List { limit } => list_workouts(&journal, *limit),
        WorkoutCommands::Remove { id } => {
            if !journal.remove_workout(*id)? {
                anyhow::bail!("Workout not found: {}", id);
            }
            println!("Removed workout {}.", id);
            Ok(())
        }
    }
}

/// Workouts sorted newest first; log order breaks ties.
fn newest_first(workouts: &[Workout]) -> Vec<&Workout> {
    let mut sorted: Vec<&Workout> = workouts.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    sorted
}

fn list_workouts(journal: &ActivityJournal<FileStore>, limit: Option<usize>) -> anyhow::Result<()> {
    if journal.workouts().is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }

    let mut workouts = newest_first(journal.workouts());
    if let Some(limit) = limit {
        workouts.truncate(limit);
    }

    println!(
        "{:<15} {:<12} {:<16} {:>8} {:<8} {:>9}  {}",
        "ID", "DATE", "ACTIVITY", "MINUTES", "EFFORT", "CALORIES", "NOTES"
    );
    println!("{}", "-".repeat(96));

    for w in &workouts {
        let calories = w
            .calories_burned
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<15} {:<12} {:<16} {:>8} {:<8} {:>9}  {}",
            w.id,
            w.date.to_string(),
            truncate(&w.activity_type, 16),
            w.duration,
            w.intensity.as_str(),
            calories,
            truncate(&w.notes, 24),
        );
    }
    println!(
        "\n{} of {} workout(s).",
        workouts.len(),
        journal.workouts().len()
    );

    Ok(())
}

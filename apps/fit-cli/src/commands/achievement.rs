// achievement.rs — Achievement subcommands: list, remove, clear, stats.

use chrono::Utc;
use clap::Subcommand;
use fit_goal::{FileStore, GoalEngine, RecordId};
use fit_journal::summary::achievement_stats;

use super::{format_value, open_engine, truncate};
use crate::config::FitConfig;

#[derive(Subcommand)]
pub enum AchievementCommands {
    /// List completed goals, newest first.
    List,
    /// Remove one achievement.
    Remove {
        /// Achievement ID (the ID the goal had).
        id: RecordId,
    },
    /// Remove every achievement.
    Clear,
    /// Totals for the achievements page.
    Stats,
}

pub fn execute(cmd: &AchievementCommands, config: &FitConfig) -> anyhow::Result<()> {
    let mut engine = open_engine(config)?;

    match cmd {
        AchievementCommands::List => list_achievements(&engine),
        AchievementCommands::Remove { id } => {
            if !engine.remove_achievement(*id)? {
                anyhow::bail!("Achievement not found: {}", id);
            }
            println!("Removed achievement {}.", id);
            Ok(())
        }
        AchievementCommands::Clear => {
            let count = engine.clear_achievements()?;
            println!("Cleared {} achievement(s).", count);
            Ok(())
        }
        AchievementCommands::Stats => show_stats(&engine),
    }
}

fn list_achievements(engine: &GoalEngine<FileStore>) -> anyhow::Result<()> {
    let mut achievements: Vec<_> = engine.achievements().iter().collect();
    if achievements.is_empty() {
        println!("No achievements yet. Complete a goal to earn one.");
        return Ok(());
    }
    achievements.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    println!(
        "{:<15} {:<30} {:<24} {:<14} {}",
        "ID", "TITLE", "TYPE", "TARGET", "COMPLETED"
    );
    println!("{}", "-".repeat(96));

    for a in &achievements {
        let target = format!(
            "{} {}",
            format_value(a.goal.target_value),
            a.goal.display_unit()
        );
        println!(
            "{:<15} {:<30} {:<24} {:<14} {}",
            a.id(),
            truncate(&a.goal.title, 28),
            a.goal.goal_type.label(),
            target.trim_end(),
            a.completed_at.format("%Y-%m-%d"),
        );
    }
    println!("\n{} achievement(s) total.", achievements.len());

    Ok(())
}

fn show_stats(engine: &GoalEngine<FileStore>) -> anyhow::Result<()> {
    match achievement_stats(engine.achievements(), Utc::now()) {
        Some(stats) => {
            println!("Total:       {}", stats.total);
            println!("This month:  {}", stats.this_month);
            println!("Most common: {}", stats.most_common.label());
        }
        None => println!("No achievements yet."),
    }
    Ok(())
}

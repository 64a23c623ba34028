// goal.rs — Goal subcommands: add, list, update, remove.

use clap::Subcommand;
use fit_goal::{FileStore, GoalEngine, NewGoal, ProgressUpdate, RecordId};

use super::{format_value, open_engine, progress_bar, truncate};
use crate::config::FitConfig;

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Add a new active goal.
    Add {
        /// Goal title (e.g., "Lose 5 kg").
        title: String,
        /// Value that counts as 100%.
        #[arg(long)]
        target: String,
        /// Where you are now (defaults to 0).
        #[arg(long)]
        current: Option<String>,
        /// Baseline for weight goals (defaults to the current value).
        #[arg(long)]
        starting: Option<String>,
        /// weight_loss, weight_gain, workouts, distance, time or increase.
        #[arg(long = "type")]
        goal_type: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// Display unit (defaults by goal type: kg, km, hours, ...).
        #[arg(long)]
        unit: Option<String>,
        /// Due date, shown as typed.
        #[arg(long)]
        target_date: Option<String>,
    },
    /// List active goals.
    List,
    /// Record a new current value for a goal.
    Update {
        /// Goal ID.
        id: RecordId,
        /// New current value. Text that isn't a number counts as 0.
        value: String,
    },
    /// Remove an active goal.
    Remove {
        /// Goal ID.
        id: RecordId,
    },
}

pub fn execute(cmd: &GoalCommands, config: &FitConfig) -> anyhow::Result<()> {
    let mut engine = open_engine(config)?;

    match cmd {
        GoalCommands::Add {
            title,
            target,
            current,
            starting,
            goal_type,
            description,
            unit,
            target_date,
        } => add_goal(
            &mut engine,
            NewGoal {
                title: title.clone(),
                description: description.clone(),
                goal_type: goal_type.clone(),
                target_value: Some(target.clone()),
                current_value: current.clone(),
                starting_value: starting.clone(),
                target_date: target_date.clone(),
                unit: unit.clone(),
            },
        ),
        GoalCommands::List => list_goals(&engine),
        GoalCommands::Update { id, value } => update_goal(&mut engine, *id, value),
        GoalCommands::Remove { id } => remove_goal(&mut engine, *id),
    }
}

fn add_goal(engine: &mut GoalEngine<FileStore>, input: NewGoal) -> anyhow::Result<()> {
    let goal = engine.create_goal(input)?;

    println!("Goal created: {}", goal.id);
    println!("  Title:    {}", goal.title);
    println!("  Type:     {}", goal.goal_type.label());
    println!(
        "  Target:   {} {}",
        format_value(goal.target_value),
        goal.display_unit()
    );
    println!("  Progress: {}%", goal.progress);

    Ok(())
}

fn list_goals(engine: &GoalEngine<FileStore>) -> anyhow::Result<()> {
    let goals = engine.active_goals();
    if goals.is_empty() {
        println!("No active goals. Add one with `fit goal add`.");
        return Ok(());
    }

    println!(
        "{:<15} {:<28} {:<12} {:<20} {}",
        "ID", "TITLE", "TYPE", "CURRENT / TARGET", "PROGRESS"
    );
    println!("{}", "-".repeat(96));

    for g in goals {
        let values = format!(
            "{} / {} {}",
            format_value(g.current_value),
            format_value(g.target_value),
            g.display_unit()
        );
        println!(
            "{:<15} {:<28} {:<12} {:<20} {} {:>3}%",
            g.id,
            truncate(&g.title, 26),
            g.goal_type.as_str(),
            truncate(values.trim_end(), 20),
            progress_bar(u32::from(g.progress), 10),
            g.progress,
        );
    }
    println!("\n{} active goal(s).", goals.len());

    Ok(())
}

fn update_goal(
    engine: &mut GoalEngine<FileStore>,
    id: RecordId,
    value: &str,
) -> anyhow::Result<()> {
    match engine.update_goal_progress(id, value)? {
        ProgressUpdate::NotFound => anyhow::bail!("Goal not found: {}", id),
        ProgressUpdate::Updated { goal_id, progress } => {
            println!("Goal {} updated: {}% complete.", goal_id, progress);
        }
        ProgressUpdate::Completed(achievement) => {
            println!(
                "Goal {} moved to achievements on {}.",
                achievement.id(),
                achievement.completed_at.format("%Y-%m-%d")
            );
        }
    }
    Ok(())
}

fn remove_goal(engine: &mut GoalEngine<FileStore>, id: RecordId) -> anyhow::Result<()> {
    if !engine.remove_goal(id)? {
        anyhow::bail!("Goal not found: {}", id);
    }
    println!("Removed goal {}.", id);
    Ok(())
}

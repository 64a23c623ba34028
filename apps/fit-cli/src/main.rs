//! # fit-cli
//!
//! Command-line interface for the fitness tracker.
//!
//! - `fit goal add/list/update/remove` — manage active goals
//! - `fit achievement list/remove/clear/stats` — completed goals
//! - `fit workout add/list/remove`, `fit meal add/list/remove` — the journal
//! - `fit profile show/set` — personal details
//! - `fit dashboard`, `fit progress` — summaries
//! - `fit history` — timeline of everything that changed

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::FitConfig;

/// Fitness tracker — log workouts and meals, track goals.
#[derive(Parser)]
#[command(name = "fit", version, about)]
struct Cli {
    /// Directory holding the `.fit/` data folder (defaults to current directory).
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Config file to use instead of `.fit/config.toml`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage active goals.
    Goal {
        #[command(subcommand)]
        command: commands::goal::GoalCommands,
    },
    /// Inspect completed goals.
    Achievement {
        #[command(subcommand)]
        command: commands::achievement::AchievementCommands,
    },
    /// Log and list workouts.
    Workout {
        #[command(subcommand)]
        command: commands::workout::WorkoutCommands,
    },
    /// Log and list meals.
    Meal {
        #[command(subcommand)]
        command: commands::meal::MealCommands,
    },
    /// Show or edit personal details.
    Profile {
        #[command(subcommand)]
        command: commands::profile::ProfileCommands,
    },
    /// This week at a glance.
    Dashboard,
    /// Trends over the last few days.
    Progress {
        /// Days to show (defaults to `progress_days` from the config).
        #[arg(long)]
        days: Option<u32>,
    },
    /// What changed recently, oldest first.
    History {
        /// Number of entries to show.
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they don't mix with command output.
    let filter = EnvFilter::from_default_env()
        .add_directive("fit_goal=info".parse()?)
        .add_directive("fit_journal=info".parse()?)
        .add_directive("fit=info".parse()?);
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
    }

    let data_dir = cli.data_dir.canonicalize().unwrap_or(cli.data_dir);
    let config = FitConfig::load(&data_dir, cli.config.as_deref());
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        store = %config.store_dir.display(),
        "using data directory"
    );

    match &cli.command {
        Commands::Goal { command } => commands::goal::execute(command, &config),
        Commands::Achievement { command } => commands::achievement::execute(command, &config),
        Commands::Workout { command } => commands::workout::execute(command, &config),
        Commands::Meal { command } => commands::meal::execute(command, &config),
        Commands::Profile { command } => commands::profile::execute(command, &config),
        Commands::Dashboard => commands::dashboard::show_dashboard(&config),
        Commands::Progress { days } => commands::dashboard::show_progress(&config, *days),
        Commands::History { limit } => commands::history::show_history(&config, *limit),
    }
}

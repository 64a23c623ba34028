// mod.rs — Subcommand implementations and the helpers they share.

pub mod achievement;
pub mod dashboard;
pub mod goal;
pub mod history;
pub mod meal;
pub mod profile;
pub mod workout;

use fit_goal::{FileStore, GoalEngine, History, Notifier};
use fit_journal::ActivityJournal;

use crate::config::FitConfig;

/// Goal engine over the configured store, recording into `history.jsonl`.
pub fn open_engine(config: &FitConfig) -> anyhow::Result<GoalEngine<FileStore>> {
    let store = FileStore::new(&config.store_dir)?;
    Ok(GoalEngine::load_with_options(store, config.engine_options())
        .with_notifier(notifier(config)))
}

/// Activity journal over the configured store.
pub fn open_journal(config: &FitConfig) -> anyhow::Result<ActivityJournal<FileStore>> {
    let store = FileStore::new(&config.store_dir)?;
    Ok(ActivityJournal::load(store).with_notifier(notifier(config)))
}

fn notifier(config: &FitConfig) -> Notifier {
    Notifier::new()
        .subscribe(History::new(&config.history_log))
        .subscribe(history::Announcer)
}

/// Shorten `s` to at most `max` characters, marking the cut with "...".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

/// Format a number without a trailing ".0" for whole values.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// A text progress bar, e.g. `[#####-----]` for 50%.
pub fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

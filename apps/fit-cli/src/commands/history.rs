// history.rs — `fit history` and the completion announcer.
//
// Every command that changes state publishes to the same two listeners:
// `History` appends the event to `.fit/history.jsonl`, and `Announcer`
// prints a line when a goal turns into an achievement.

use fit_goal::{EventSink, FitEvent, GoalError, History};

use crate::config::FitConfig;

/// Prints a celebration when a goal is completed; ignores everything else.
pub struct Announcer;

impl EventSink for Announcer {
    fn notify(&self, event: &FitEvent) -> Result<(), GoalError> {
        if let Some(line) = announcement(event) {
            println!("{}", line);
        }
        Ok(())
    }
}

fn announcement(event: &FitEvent) -> Option<String> {
    match event {
        FitEvent::GoalCompleted {
            title, goal_type, ..
        } => Some(format!(
            "Achievement unlocked: {} ({})",
            title,
            goal_type.label()
        )),
        _ => None,
    }
}

/// Print the newest `limit` events, oldest first.
pub fn show_history(config: &FitConfig, limit: usize) -> anyhow::Result<()> {
    let events = History::new(&config.history_log).recent(limit)?;
    if events.is_empty() {
        println!("No activity yet.");
        return Ok(());
    }

    for event in &events {
        println!(
            "{}  {:<22} {}",
            event.timestamp().format("%Y-%m-%d %H:%M"),
            event.event_type(),
            event.describe()
        );
    }
    Ok(())
}

// cli_flow.rs — End-to-end test driving the `fit` binary.
//
// Flow:
//   1. fit goal add → goal stored in .fit/store/fitnessProfile.json
//   2. fit workout add / meal add → journal blobs written
//   3. fit goal update to the target → goal moves to achievements
//   4. fit dashboard / progress / achievement stats render
//   5. history.jsonl carries one line per mutation; fit history reads it

use std::path::Path;
use std::process::{Command, Output};

use fit_goal::{FileStore, GoalEngine};
use fit_journal::ActivityJournal;
use tempfile::TempDir;

fn fit(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fit"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "fit failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn goal_journal_and_summaries() {
    let dir = TempDir::new().unwrap();
    let store_dir = dir.path().join(".fit/store");

    // 1. Add a goal.
    stdout_of(&fit(
        dir.path(),
        &["goal", "add", "Run 10 times", "--target", "10", "--type", "workouts"],
    ));
    let engine = GoalEngine::load(FileStore::new(&store_dir).unwrap());
    assert_eq!(engine.active_goals().len(), 1);
    let goal_id = engine.active_goals()[0].id.to_string();

    // 2. Log a workout and a meal.
    stdout_of(&fit(
        dir.path(),
        &["workout", "add", "Running", "--duration", "30", "--intensity", "high", "--calories", "320"],
    ));
    stdout_of(&fit(
        dir.path(),
        &["meal", "add", "breakfast", "--calories", "380", "--food", "Oatmeal", "--food", "Berries"],
    ));
    let journal = ActivityJournal::load(FileStore::new(&store_dir).unwrap());
    assert_eq!(journal.workouts().len(), 1);
    assert_eq!(journal.meals()[0].food_items.len(), 2);

    // Invalid input is rejected with a non-zero exit.
    let bad = fit(dir.path(), &["workout", "add", "Running", "--duration", "soon"]);
    assert!(!bad.status.success());

    // 3. Partial progress, then completion.
    let out = stdout_of(&fit(dir.path(), &["goal", "update", &goal_id, "4"]));
    assert!(out.contains("40%"));
    let out = stdout_of(&fit(dir.path(), &["goal", "update", &goal_id, "10"]));
    assert!(out.contains("Achievement unlocked: Run 10 times (Workout Count)"));

    let engine = GoalEngine::load(FileStore::new(&store_dir).unwrap());
    assert!(engine.active_goals().is_empty());
    assert_eq!(engine.achievements().len(), 1);
    assert_eq!(engine.achievements()[0].goal.progress, 100);

    // Unknown ids fail.
    assert!(!fit(dir.path(), &["goal", "update", "1", "5"]).status.success());

    // 4. Summaries render.
    let out = stdout_of(&fit(dir.path(), &["dashboard"]));
    assert!(out.contains("Calories today:     380"));
    assert!(out.contains("Running for 30 minutes"));

    let out = stdout_of(&fit(dir.path(), &["progress", "--days", "3"]));
    assert!(out.contains("Last 3 days"));
    assert!(out.contains("Favorite activity: Running"));

    // Without --days the charts follow the dates that have data.
    let out = stdout_of(&fit(dir.path(), &["progress"]));
    assert!(out.contains("Workouts on the last 1 workout days"));
    assert!(out.contains("Calories on the last 1 logged days"));

    let out = stdout_of(&fit(dir.path(), &["achievement", "stats"]));
    assert!(out.contains("Total:       1"));
    assert!(out.contains("Workout Count"));

    // 5. One event per mutation: created, workout, meal, updated, completed.
    let events = std::fs::read_to_string(dir.path().join(".fit/history.jsonl")).unwrap();
    assert_eq!(events.lines().count(), 5);
    assert!(events.contains("\"event_type\":\"goal_completed\""));

    let out = stdout_of(&fit(dir.path(), &["history", "--limit", "2"]));
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("\"Run 10 times\" is at 40%"));
    assert!(out.contains("Completed \"Run 10 times\" (Workout Count)"));
}

#[test]
fn empty_log_uses_the_trailing_window() {
    let dir = TempDir::new().unwrap();

    let out = stdout_of(&fit(dir.path(), &["progress"]));
    assert!(out.contains("Last 14 days"));

    let out = stdout_of(&fit(dir.path(), &["history"]));
    assert!(out.contains("No activity yet."));
}

#[test]
fn profile_set_merges_fields() {
    let dir = TempDir::new().unwrap();

    stdout_of(&fit(dir.path(), &["profile", "set", "--name", "Sam", "--weight", "80"]));
    stdout_of(&fit(dir.path(), &["profile", "set", "--height", "180"]));

    let out = stdout_of(&fit(dir.path(), &["profile", "show"]));
    assert!(out.contains("Name:          Sam"));
    assert!(out.contains("Weight:        80 kg"));
    assert!(out.contains("Height:        180 cm"));
    assert!(out.contains("Daily steps:   10000"));
}

#[test]
fn config_file_changes_weekly_target() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("fit.toml");
    std::fs::write(&config, "[dashboard]\nweekly_workout_target = 1\n").unwrap();

    stdout_of(&fit(
        dir.path(),
        &["workout", "add", "Yoga", "--duration", "45"],
    ));

    let out = stdout_of(&fit(
        dir.path(),
        &["--config", config.to_str().unwrap(), "dashboard"],
    ));
    assert!(out.contains("Weekly progress:    100% of 1 workouts"));
}

// config.rs — Where `fit` keeps its state, and the optional config file.
//
// FitConfig computes a `.fit/` layout under the data directory: one JSON
// file per store key, the activity history, and `config.toml`. The config file is
// optional; every setting has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use fit_goal::EngineOptions;
use fit_journal::summary::DEFAULT_WEEKLY_WORKOUT_TARGET;

/// Resolved paths plus the settings loaded from `config.toml`.
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Directory the `.fit/` folder lives in.
    pub data_dir: PathBuf,

    /// FileStore directory (`fitnessProfile.json`, `fitnessWorkouts.json`, ...).
    pub store_dir: PathBuf,

    /// Activity history, one JSON event per line (`fit history`).
    pub history_log: PathBuf,

    /// Default location of the config file.
    pub config_file: PathBuf,

    pub settings: Settings,
}

impl FitConfig {
    /// Standard `.fit/` layout for a data directory, with default settings.
    pub fn for_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let root = data_dir.as_ref().to_path_buf();
        let fit_dir = root.join(".fit");
        Self {
            data_dir: root,
            store_dir: fit_dir.join("store"),
            history_log: fit_dir.join("history.jsonl"),
            config_file: fit_dir.join("config.toml"),
            settings: Settings::default(),
        }
    }

    /// Layout for `data_dir` with settings read from `config_override`, or
    /// from `.fit/config.toml` when no override is given.
    pub fn load(data_dir: impl AsRef<Path>, config_override: Option<&Path>) -> Self {
        let mut config = Self::for_data_dir(data_dir);
        let path = config_override.unwrap_or(&config.config_file);
        config.settings = Settings::load_or_default(path);
        config
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            strict: self.settings.goals.strict,
        }
    }
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub goals: GoalSettings,

    #[serde(default)]
    pub dashboard: DashboardSettings,
}

/// `[goals]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalSettings {
    /// Reject goals that can never make progress (e.g. weight loss with a
    /// target above the starting weight).
    #[serde(default)]
    pub strict: bool,
}

/// `[dashboard]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Workouts per week that count as 100% weekly progress.
    #[serde(default = "default_weekly_workout_target")]
    pub weekly_workout_target: u32,

    /// Days shown by `fit progress` when `--days` isn't given and nothing
    /// is logged yet.
    #[serde(default = "default_progress_days")]
    pub progress_days: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            weekly_workout_target: default_weekly_workout_target(),
            progress_days: default_progress_days(),
        }
    }
}

// Serde default functions
fn default_weekly_workout_target() -> u32 {
    DEFAULT_WEEKLY_WORKOUT_TARGET
}

fn default_progress_days() -> u32 {
    14
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults. A missing file is normal;
    /// an unreadable or malformed one is logged.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring config file: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn layout_lives_under_dot_fit() {
        let config = FitConfig::for_data_dir("/tmp/athlete");
        assert_eq!(config.store_dir, PathBuf::from("/tmp/athlete/.fit/store"));
        assert_eq!(config.history_log, PathBuf::from("/tmp/athlete/.fit/history.jsonl"));
        assert_eq!(config.config_file, PathBuf::from("/tmp/athlete/.fit/config.toml"));
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn defaults_without_a_file() {
        let dir = TempDir::new().unwrap();
        let config = FitConfig::load(dir.path(), None);
        assert!(!config.settings.goals.strict);
        assert_eq!(config.settings.dashboard.weekly_workout_target, 5);
        assert_eq!(config.settings.dashboard.progress_days, 14);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let config = FitConfig::for_data_dir(dir.path());
        std::fs::create_dir_all(config.config_file.parent().unwrap()).unwrap();
        std::fs::write(&config.config_file, "[goals]\nstrict = true\n").unwrap();

        let config = FitConfig::load(dir.path(), None);
        assert!(config.engine_options().strict);
        assert_eq!(config.settings.dashboard.weekly_workout_target, 5);
    }

    #[test]
    fn override_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[dashboard]\nweekly_workout_target = 3\nprogress_days = 7\n",
        )
        .unwrap();

        let config = FitConfig::load(dir.path(), Some(&path));
        assert_eq!(config.settings.dashboard.weekly_workout_target, 3);
        assert_eq!(config.settings.dashboard.progress_days, 7);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[goals\nstrict = ").unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}

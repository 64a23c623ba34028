// profile.rs — Profile subcommands: show, set.

use clap::Subcommand;
use fit_goal::{FileStore, GoalEngine, Profile, ProfileDetails};

use super::{format_value, open_engine};
use crate::config::FitConfig;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show personal details.
    Show,
    /// Change personal details. Fields not given keep their current value.
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        /// Weight in kg.
        #[arg(long)]
        weight: Option<f64>,
        /// Height in cm.
        #[arg(long)]
        height: Option<f64>,
        /// Target weight in kg.
        #[arg(long)]
        target_weight: Option<f64>,
        #[arg(long)]
        daily_steps: Option<i64>,
    },
}

pub fn execute(cmd: &ProfileCommands, config: &FitConfig) -> anyhow::Result<()> {
    let mut engine = open_engine(config)?;

    match cmd {
        ProfileCommands::Show => {
            show_profile(engine.profile());
            Ok(())
        }
        ProfileCommands::Set {
            name,
            age,
            weight,
            height,
            target_weight,
            daily_steps,
        } => {
            let current = engine.profile();
            let details = ProfileDetails {
                name: name.clone().or_else(|| current.name.clone()),
                age: age.or(current.age),
                weight: weight.or(current.weight),
                height: height.or(current.height),
                target_weight: target_weight.or(current.target_weight),
                daily_steps: daily_steps.or(current.daily_steps),
            };
            set_profile(&mut engine, details)
        }
    }
}

fn set_profile(engine: &mut GoalEngine<FileStore>, details: ProfileDetails) -> anyhow::Result<()> {
    engine.update_profile(details)?;
    println!("Profile updated.");
    show_profile(engine.profile());
    Ok(())
}

fn show_profile(profile: &Profile) {
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());

    println!("Name:          {}", or_dash(profile.name.clone()));
    println!("Age:           {}", or_dash(profile.age.map(|a| a.to_string())));
    println!(
        "Weight:        {}",
        or_dash(profile.weight.map(|w| format!("{} kg", format_value(w))))
    );
    println!(
        "Height:        {}",
        or_dash(profile.height.map(|h| format!("{} cm", format_value(h))))
    );
    println!(
        "Target weight: {}",
        or_dash(profile.target_weight.map(|w| format!("{} kg", format_value(w))))
    );
    println!("Daily steps:   {}", profile.daily_steps_or_default());
    if let (Some(weight), Some(height)) = (profile.weight, profile.height) {
        if height > 0.0 {
            let meters = height / 100.0;
            println!("BMI:           {:.1}", weight / (meters * meters));
        }
    }
    println!("Active goals:  {}", profile.goals.len());
}

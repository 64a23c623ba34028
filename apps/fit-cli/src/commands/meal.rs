// meal.rs — Meal subcommands: add, list, remove.

use chrono::NaiveDate;
use clap::Subcommand;
use fit_goal::{FileStore, RecordId};
use fit_journal::{ActivityJournal, NewMeal};

use super::{format_value, open_journal, truncate};
use crate::config::FitConfig;

#[derive(Subcommand)]
pub enum MealCommands {
    /// Log a meal.
    Add {
        /// Meal type (e.g., "breakfast", "snack").
        meal_type: String,
        /// Total calories.
        #[arg(long)]
        calories: String,
        /// A food item; repeat for several.
        #[arg(long = "food", required = true)]
        food_items: Vec<String>,
        /// Protein in grams.
        #[arg(long)]
        proteins: Option<String>,
        /// Carbohydrates in grams.
        #[arg(long)]
        carbs: Option<String>,
        /// Fat in grams.
        #[arg(long)]
        fats: Option<String>,
        /// Date as YYYY-MM-DD (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List meals, newest first.
    List {
        /// Only meals on this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Remove a logged meal.
    Remove {
        /// Meal ID.
        id: RecordId,
    },
}

pub fn execute(cmd: &MealCommands, config: &FitConfig) -> anyhow::Result<()> {
    let mut journal = open_journal(config)?;

    match cmd {
        MealCommands::Add {
            meal_type,
            calories,
            food_items,
            proteins,
            carbs,
            fats,
            date,
        } => {
            let meal = journal.add_meal(NewMeal {
                meal_type: meal_type.clone(),
                food_items: food_items.clone(),
                calories: calories.clone(),
                date: *date,
                proteins: proteins.clone(),
                carbs: carbs.clone(),
                fats: fats.clone(),
            })?;
            println!(
                "Meal logged: {} ({}, {} calories on {})",
                meal.id, meal.meal_type, meal.calories, meal.date
            );
            Ok(())
        }
        MealCommands::List { date } => list_meals(&journal, *date),
        MealCommands::Remove { id } => {
            if !journal.remove_meal(*id)? {
                anyhow::bail!("Meal not found: {}", id);
            }
            println!("Removed meal {}.", id);
            Ok(())
        }
    }
}

fn list_meals(journal: &ActivityJournal<FileStore>, date: Option<NaiveDate>) -> anyhow::Result<()> {
    let mut meals: Vec<_> = journal
        .meals()
        .iter()
        .filter(|m| date.map_or(true, |d| m.date == d))
        .collect();
    if meals.is_empty() {
        println!("No meals logged.");
        return Ok(());
    }
    meals.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    println!(
        "{:<15} {:<12} {:<12} {:>9} {:<16} {}",
        "ID", "DATE", "MEAL", "CALORIES", "P / C / F (g)", "FOOD"
    );
    println!("{}", "-".repeat(96));

    let macro_text = |v: Option<f64>| v.map(format_value).unwrap_or_else(|| "-".to_string());
    for m in &meals {
        let macros = format!(
            "{} / {} / {}",
            macro_text(m.proteins),
            macro_text(m.carbs),
            macro_text(m.fats)
        );
        println!(
            "{:<15} {:<12} {:<12} {:>9} {:<16} {}",
            m.id,
            m.date.to_string(),
            truncate(&m.meal_type, 12),
            m.calories,
            macros,
            truncate(&m.food_items.join(", "), 30),
        );
    }

    let total: i64 = meals.iter().map(|m| m.calories).sum();
    println!("\n{} meal(s), {} calories.", meals.len(), total);

    Ok(())
}

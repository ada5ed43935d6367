use anyhow::Result;
use chrono::NaiveDate;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use lighter_core::models::{Username, weight_kg};
use lighter_core::tracker::Tracker;

use super::helpers::{display_value, print_json, print_meal_table};

pub(crate) fn cmd_dashboard(
    tracker: &Tracker,
    user: &Username,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let dash = tracker.dashboard(user, today)?;

    if json {
        return print_json(&dash);
    }

    println!("=== {user} ===\n");

    if dash.calories_per_day.is_empty() {
        eprintln!("No meals logged yet");
    } else {
        #[derive(Tabled)]
        struct DayRow {
            #[tabled(rename = "Date")]
            date: String,
            #[tabled(rename = "Calories")]
            calories: i64,
            #[tabled(rename = "Goal")]
            hit: String,
        }

        let rows: Vec<DayRow> = dash
            .calories_per_day
            .iter()
            .map(|(date, &calories)| DayRow {
                date: date.clone(),
                calories,
                hit: match dash.goal_hits.get(date) {
                    Some(true) => "hit".to_string(),
                    Some(false) => "missed".to_string(),
                    None => "-".to_string(),
                },
            })
            .collect();

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
            .to_string();
        println!("{table}\n");
    }

    println!("  TODAY: {} kcal", dash.consumed);
    if let Some(goal) = &dash.goal {
        println!(
            "  TARGET: {:.0} kcal ({} {} kg/week)",
            dash.target, goal.goal_type, goal.goal_rate
        );
        println!("  REMAINING: {:.0} kcal", dash.remaining);
    }
    println!("  STREAK: {} day(s)", dash.streak);
    if let Some(latest) = &dash.latest_weight {
        match weight_kg(&latest.weight) {
            Some(kg) => println!("  WEIGHT: {kg:.1} kg ({})", latest.date),
            None => println!("  WEIGHT: {} ({})", display_value(&latest.weight), latest.date),
        }
    }
    Ok(())
}

pub(crate) fn cmd_tracker(tracker: &Tracker, user: &Username, json: bool) -> Result<()> {
    let meals = tracker.meals(user)?;

    if json {
        return print_json(&meals);
    }
    if meals.is_empty() {
        eprintln!("No meals logged for {user}");
        return Ok(());
    }

    for (date, entries) in meals.iter().rev() {
        println!("=== {date} ===");
        print_meal_table(entries);
        println!();
    }
    Ok(())
}

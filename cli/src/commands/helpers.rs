use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use lighter_core::catalog::FoodItem;
use lighter_core::models::{DATE_FORMAT, MealEntry, date_key};

/// Resolve a `--date` argument to a `YYYY-MM-DD` key.
/// Accepts an ISO date or today/yesterday/tomorrow relative to `today`.
pub(crate) fn parse_date(date_str: Option<&str>, today: NaiveDate) -> Result<String> {
    let date = match date_str.map(str::trim) {
        None | Some("" | "today") => today,
        Some("yesterday") => today - Duration::days(1),
        Some("tomorrow") => today + Duration::days(1),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT).with_context(|| {
            format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
        })?,
    };
    Ok(date_key(date))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_food_table(foods: &[&FoodItem]) {
    #[derive(Tabled)]
    struct FoodRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Unit")]
        unit: String,
    }

    let rows: Vec<FoodRow> = foods
        .iter()
        .enumerate()
        .map(|(i, f)| FoodRow {
            idx: i + 1,
            name: truncate(&f.name, 30),
            calories: format!("{:.0}", f.calorie_base),
            unit: f.unit.clone(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn print_meal_table(entries: &[MealEntry]) {
    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "Meal")]
        meal: String,
        #[tabled(rename = "Food")]
        food: String,
        #[tabled(rename = "Amount")]
        amount: String,
        #[tabled(rename = "Calories")]
        calories: String,
    }

    let rows: Vec<MealRow> = entries
        .iter()
        .map(|e| MealRow {
            meal: display_value(&e.meal_type),
            food: truncate(&display_value(&e.food), 30),
            amount: display_value(&e.amount),
            calories: display_value(&e.calories),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

/// A stored field as the client sent it: strings unquoted, null as "-".
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

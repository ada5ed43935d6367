use anyhow::{Result, bail};

use lighter_core::catalog::{FoodCatalog, FoodItem};
use lighter_core::tracker::Tracker;

use super::helpers::{print_food_table, print_json};

pub(crate) fn cmd_foods(catalog: &FoodCatalog, search: Option<&str>, json: bool) -> Result<()> {
    let foods: Vec<&FoodItem> = match search {
        Some(q) => catalog.search(q),
        None => catalog.iter().collect(),
    };

    if json {
        return print_json(&foods);
    }
    if foods.is_empty() {
        bail!("No food found matching '{}'", search.unwrap_or_default());
    }
    print_food_table(&foods);
    Ok(())
}

pub(crate) fn cmd_calc(tracker: &Tracker, food: &str, amount: f64, meal: &str, json: bool) -> Result<()> {
    let estimate = tracker.calculate(food, amount, meal)?;

    if json {
        print_json(&estimate)
    } else {
        println!(
            "{} x {} ({}) = {:.2} kcal [{}]",
            estimate.amount, estimate.food, estimate.unit, estimate.calories, estimate.meal
        );
        Ok(())
    }
}

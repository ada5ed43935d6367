use serde::Serialize;
use serde_json::Value;

use crate::catalog::FoodCatalog;
use crate::error::{LighterError, Result};
use crate::models::{MealEntry, validate_meal_type};

/// How an amount is read against a catalog unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Portion {
    /// "per 100g": amount is grams.
    Grams(f64),
    /// "per piece", "per cup", "per bowl": amount is a count.
    Count,
    /// Anything else ("per glass", "per serving", ...): one fixed portion, amount ignored.
    Fixed,
}

impl Portion {
    #[must_use]
    pub fn from_unit(unit: &str) -> Self {
        if unit.contains("per") && unit.contains('g') {
            if let Some(grams) = gram_basis(unit) {
                return Self::Grams(grams);
            }
        }
        if ["piece", "cup", "bowl"].iter().any(|k| unit.contains(*k)) {
            Self::Count
        } else {
            Self::Fixed
        }
    }

    #[must_use]
    pub fn calories(self, amount: f64, calorie_base: f64) -> f64 {
        match self {
            Self::Grams(grams) => amount / grams * calorie_base,
            Self::Count => amount * calorie_base,
            Self::Fixed => calorie_base,
        }
    }
}

/// Parse "per 100g" into 100.0.
fn gram_basis(unit: &str) -> Option<f64> {
    let (_, rest) = unit.split_once("per")?;
    let grams: f64 = rest.trim().strip_suffix('g')?.trim().parse().ok()?;
    (grams.is_finite() && grams > 0.0).then_some(grams)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorieEstimate {
    pub meal: String,
    pub food: String,
    pub amount: f64,
    pub unit: String,
    pub calories: f64,
}

impl From<CalorieEstimate> for MealEntry {
    fn from(estimate: CalorieEstimate) -> Self {
        MealEntry {
            meal_type: Value::String(estimate.meal),
            food: Value::String(estimate.food),
            amount: Value::from(estimate.amount),
            unit: Value::String(estimate.unit),
            calories: Value::from(estimate.calories),
            ..MealEntry::default()
        }
    }
}

/// Calories for `amount` of a catalog food, rounded to 2 decimals.
pub fn calculate(
    catalog: &FoodCatalog,
    food: &str,
    amount: f64,
    meal: &str,
) -> Result<CalorieEstimate> {
    let item = catalog
        .get(food)
        .ok_or_else(|| LighterError::UnknownFood(food.trim().to_string()))?;
    let meal = validate_meal_type(meal)?;
    if !amount.is_finite() {
        return Err(LighterError::validation("amount must be a finite number"));
    }

    let raw = Portion::from_unit(&item.unit).calories(amount, item.calorie_base);

    Ok(CalorieEstimate {
        meal,
        food: item.name.clone(),
        amount,
        unit: item.unit.clone(),
        calories: round2(raw),
    })
}

/// Two decimals, exact halves to the even neighbour (1.125 -> 1.12).
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

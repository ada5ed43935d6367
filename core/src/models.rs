use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LighterError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MEAL_TYPES: &[&str] = &["breakfast", "lunch", "dinner", "snack"];

/// Date-keyed meal log. Keys are `YYYY-MM-DD`, so lexicographic order is chronological.
pub type MealStore = BTreeMap<String, Vec<MealEntry>>;

/// Date-keyed body weight log, one value per day. Values are kept exactly as
/// stored; see [`weight_kg`] for reading one as a number.
pub type WeightStore = BTreeMap<String, Value>;

/// A logged meal as stored in the user's meal file.
///
/// Entries come from clients, so every field is optional and unknown keys are
/// kept as-is. Descriptive fields and `calories` hold whatever JSON was sent;
/// they are only interpreted when read (see [`MealEntry::calorie_count`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    #[serde(rename = "meal", default, skip_serializing_if = "Value::is_null")]
    pub meal_type: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub food: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub amount: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub unit: Value,
    #[serde(default)]
    pub calories: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MealEntry {
    /// Whole calories for this entry.
    ///
    /// Integers count as-is, floats are truncated toward zero and strings holding
    /// an integer are parsed. Anything else (missing, null, text) counts as 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn calorie_count(&self) -> i64 {
        match &self.calories {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .unwrap_or(0),
            Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
            _ => 0,
        }
    }

    #[must_use]
    pub fn food_name(&self) -> Option<&str> {
        self.food.as_str()
    }

    #[must_use]
    pub fn meal_name(&self) -> Option<&str> {
        self.meal_type.as_str()
    }
}

/// A stored weight as kg: JSON numbers and numeric strings, anything else is `None`.
#[must_use]
pub fn weight_kg(value: &Value) -> Option<f64> {
    let kg: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    kg.filter(|w| w.is_finite())
}

/// A user name as typed at login. Storage is keyed on the lowercased form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LighterError::validation("Username must not be empty"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            || name.starts_with('.')
        {
            return Err(LighterError::validation(format!(
                "Invalid username '{name}'. Use letters, digits, '-', '_' or '.'"
            )));
        }
        Ok(Self(name.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive key used for file naming.
    #[must_use]
    pub fn storage_key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn validate_meal_type(meal: &str) -> Result<String> {
    let lower = meal.trim().to_lowercase();
    if MEAL_TYPES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(LighterError::validation(format!(
            "Invalid meal type '{meal}'. Must be one of: {}",
            MEAL_TYPES.join(", ")
        )))
    }
}

/// Resolve an optional caller-supplied date into a `YYYY-MM-DD` key.
/// Missing or blank dates fall back to `today`.
pub fn resolve_date_key(date: Option<&str>, today: NaiveDate) -> Result<String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(date_key(today)),
        Some(d) => NaiveDate::parse_from_str(d, DATE_FORMAT)
            .map(date_key)
            .map_err(|_| LighterError::validation(format!("Invalid date '{d}'. Use YYYY-MM-DD"))),
    }
}

#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

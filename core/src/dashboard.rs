use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::FoodItem;
use crate::goal::GoalRecord;
use crate::models::{MealEntry, MealStore, WeightStore, date_key};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestWeight {
    pub date: String,
    pub weight: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub calories_per_day: BTreeMap<String, i64>,
    pub weights: WeightStore,
    pub goal: Option<GoalRecord>,
    pub goal_hits: BTreeMap<String, bool>,
    pub streak: u32,
    pub latest_weight: Option<LatestWeight>,
    pub consumed: i64,
    pub target: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub foods: Vec<FoodItem>,
    pub today: String,
    pub today_meals: Vec<MealEntry>,
    pub consumed: i64,
    pub target: f64,
    pub remaining: f64,
}

/// Total calories logged on each date.
#[must_use]
pub fn calories_per_day(meals: &MealStore) -> BTreeMap<String, i64> {
    meals
        .iter()
        .map(|(date, entries)| (date.clone(), day_total(entries)))
        .collect()
}

/// Saturates instead of overflowing; stored calories are never range-checked.
#[must_use]
pub fn day_total(entries: &[MealEntry]) -> i64 {
    entries
        .iter()
        .map(MealEntry::calorie_count)
        .fold(0, i64::saturating_add)
}

/// Judge every day against the goal that is active now, not the goal that was
/// active on that day.
#[must_use]
pub fn goal_hits(
    per_day: &BTreeMap<String, i64>,
    goal: Option<&GoalRecord>,
) -> BTreeMap<String, bool> {
    let Some(goal) = goal else {
        return BTreeMap::new();
    };
    per_day
        .iter()
        .map(|(date, &total)| (date.clone(), goal.goal_type.is_hit(total, goal.daily_goal)))
        .collect()
}

/// Consecutive days with at least one meal, counting back from `today`.
/// An empty `today` gives 0.
#[must_use]
pub fn streak(meals: &MealStore, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while meals
        .get(&date_key(day))
        .is_some_and(|entries| !entries.is_empty())
    {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Entry with the greatest date key.
#[must_use]
pub fn latest_weight(weights: &WeightStore) -> Option<LatestWeight> {
    weights.iter().next_back().map(|(date, weight)| LatestWeight {
        date: date.clone(),
        weight: weight.clone(),
    })
}

#[must_use]
pub fn build_dashboard(
    meals: &MealStore,
    weights: WeightStore,
    goal: Option<GoalRecord>,
    today: NaiveDate,
) -> Dashboard {
    let per_day = calories_per_day(meals);
    let hits = goal_hits(&per_day, goal.as_ref());
    let consumed = per_day.get(&date_key(today)).copied().unwrap_or(0);
    let target = goal.map_or(0.0, |g| g.daily_goal);

    Dashboard {
        goal_hits: hits,
        streak: streak(meals, today),
        latest_weight: latest_weight(&weights),
        calories_per_day: per_day,
        weights,
        goal,
        consumed,
        target,
        remaining: remaining(target, consumed),
    }
}

#[must_use]
pub fn build_home(
    foods: Vec<FoodItem>,
    meals: &MealStore,
    goal: Option<&GoalRecord>,
    today: NaiveDate,
) -> HomeView {
    let today = date_key(today);
    let today_meals = meals.get(&today).cloned().unwrap_or_default();
    let consumed = day_total(&today_meals);
    let target = goal.map_or(0.0, |g| g.daily_goal);

    HomeView {
        foods,
        today,
        today_meals,
        consumed,
        target,
        remaining: remaining(target, consumed),
    }
}

#[allow(clippy::cast_precision_loss)]
fn remaining(target: f64, consumed: i64) -> f64 {
    target - consumed as f64
}

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::calculator::{self, CalorieEstimate};
use crate::catalog::{FoodCatalog, FoodItem};
use crate::dashboard::{self, Dashboard, HomeView};
use crate::error::Result;
use crate::goal::{GoalRecord, GoalRequest};
use crate::models::{MealEntry, MealStore, Username, WeightStore, resolve_date_key};
use crate::store::{self, RecordStore, StoreKind};

/// Per-user tracking operations over a [`RecordStore`].
///
/// Callers pass `today` explicitly; the service layer supplies the local date.
#[derive(Clone)]
pub struct Tracker {
    store: Arc<dyn RecordStore>,
    catalog: Arc<FoodCatalog>,
}

impl Tracker {
    pub fn new(store: Arc<dyn RecordStore>, catalog: FoodCatalog) -> Self {
        Self {
            store,
            catalog: Arc::new(catalog),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &FoodCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn foods(&self) -> Vec<FoodItem> {
        self.catalog.iter().cloned().collect()
    }

    pub fn calculate(&self, food: &str, amount: f64, meal: &str) -> Result<CalorieEstimate> {
        calculator::calculate(&self.catalog, food, amount, meal)
    }

    pub fn meals(&self, user: &Username) -> Result<MealStore> {
        Ok(store::load(self.store.as_ref(), user, StoreKind::Meals)?)
    }

    pub fn weights(&self, user: &Username) -> Result<WeightStore> {
        Ok(store::load(self.store.as_ref(), user, StoreKind::Weights)?)
    }

    pub fn goal(&self, user: &Username) -> Result<Option<GoalRecord>> {
        Ok(store::load(self.store.as_ref(), user, StoreKind::Goals)?)
    }

    /// Append `entry` to the list for its date and rewrite the meal store.
    /// Returns the date key the entry was filed under.
    pub fn log_meal(&self, user: &Username, mut entry: MealEntry, today: NaiveDate) -> Result<String> {
        let date = resolve_date_key(entry.date.as_deref(), today)?;
        entry.date = Some(date.clone());

        let mut meals: MealStore =
            store::load_for_update(self.store.as_ref(), user, StoreKind::Meals)?;
        meals.entry(date.clone()).or_default().push(entry);
        store::save(self.store.as_ref(), user, StoreKind::Meals, &meals)?;

        info!(user = %user, %date, "meal logged");
        Ok(date)
    }

    /// Record `weight` for the date, replacing any earlier value for that day.
    pub fn log_weight(
        &self,
        user: &Username,
        date: Option<&str>,
        weight: f64,
        today: NaiveDate,
    ) -> Result<String> {
        let date = resolve_date_key(date, today)?;

        let mut weights: WeightStore =
            store::load_for_update(self.store.as_ref(), user, StoreKind::Weights)?;
        weights.insert(date.clone(), Value::from(weight));
        store::save(self.store.as_ref(), user, StoreKind::Weights, &weights)?;

        info!(user = %user, %date, weight, "weight logged");
        Ok(date)
    }

    /// Derive a daily goal and replace the stored one.
    pub fn set_goal(&self, user: &Username, req: &GoalRequest) -> Result<GoalRecord> {
        let record = GoalRecord::from_request(req);
        store::save(self.store.as_ref(), user, StoreKind::Goals, &record)?;
        info!(
            user = %user,
            goal_type = %record.goal_type,
            daily_goal = record.daily_goal,
            "goal set"
        );
        Ok(record)
    }

    pub fn home(&self, user: &Username, today: NaiveDate) -> Result<HomeView> {
        let meals = self.meals(user)?;
        let goal = self.goal(user)?;
        Ok(dashboard::build_home(self.foods(), &meals, goal.as_ref(), today))
    }

    pub fn dashboard(&self, user: &Username, today: NaiveDate) -> Result<Dashboard> {
        let meals = self.meals(user)?;
        let weights = self.weights(user)?;
        let goal = self.goal(user)?;
        Ok(dashboard::build_dashboard(&meals, weights, goal, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::GoalType;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn tracker() -> Tracker {
        Tracker::new(Arc::new(MemoryStore::new()), FoodCatalog::builtin())
    }

    fn boo() -> Username {
        Username::new("boo").unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 8).unwrap()
    }

    #[test]
    fn test_log_meal_appends_in_order() {
        let t = tracker();
        for food in ["idli", "vada", "filter coffee"] {
            let estimate = t.calculate(food, 1.0, "breakfast").unwrap();
            t.log_meal(&boo(), estimate.into(), today()).unwrap();
        }

        let meals = t.meals(&boo()).unwrap();
        let foods: Vec<&str> = meals["2025-11-08"]
            .iter()
            .filter_map(MealEntry::food_name)
            .collect();
        assert_eq!(foods, vec!["idli", "vada", "filter coffee"]);
        assert_eq!(meals["2025-11-08"][0].date.as_deref(), Some("2025-11-08"));
    }

    #[test]
    fn test_log_meal_uses_supplied_date() {
        let t = tracker();
        let entry = MealEntry {
            calories: json!(200),
            date: Some("2025-11-01".to_string()),
            ..MealEntry::default()
        };
        let date = t.log_meal(&boo(), entry, today()).unwrap();
        assert_eq!(date, "2025-11-01");
        assert!(t.meals(&boo()).unwrap().contains_key("2025-11-01"));
    }

    #[test]
    fn test_log_meal_rejects_bad_date() {
        let t = tracker();
        let entry = MealEntry {
            date: Some("yesterday-ish".to_string()),
            ..MealEntry::default()
        };
        assert!(t.log_meal(&boo(), entry, today()).is_err());
        assert!(t.meals(&boo()).unwrap().is_empty());
    }

    #[test]
    fn test_log_weight_last_write_wins() {
        let t = tracker();
        t.log_weight(&boo(), None, 68.0, today()).unwrap();
        t.log_weight(&boo(), Some("2025-11-08"), 67.4, today()).unwrap();
        t.log_weight(&boo(), Some("2025-11-01"), 69.0, today()).unwrap();

        let weights = t.weights(&boo()).unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights["2025-11-08"], json!(67.4));
    }

    #[test]
    fn test_set_goal_replaces_previous() {
        let t = tracker();
        t.set_goal(
            &boo(),
            &GoalRequest {
                current_weight: 70.0,
                goal_type: GoalType::Lose,
                goal_rate: 0.5,
            },
        )
        .unwrap();
        let second = t
            .set_goal(
                &boo(),
                &GoalRequest {
                    current_weight: 69.0,
                    goal_type: GoalType::Gain,
                    goal_rate: 0.25,
                },
            )
            .unwrap();

        let stored = t.goal(&boo()).unwrap().unwrap();
        assert_eq!(stored, second);
        assert!((stored.daily_goal - 2475.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dashboard_for_new_user_is_empty() {
        let t = tracker();
        let dash = t.dashboard(&Username::new("nobody").unwrap(), today()).unwrap();
        assert_eq!(dash.streak, 0);
        assert_eq!(dash.consumed, 0);
        assert!(dash.goal.is_none());
        assert!(dash.weights.is_empty());
    }

    #[test]
    fn test_dashboard_after_logging() {
        let t = tracker();
        let yesterday = NaiveDate::from_ymd_opt(2025, 11, 7).unwrap();
        t.log_meal(&boo(), t.calculate("idli", 3.0, "breakfast").unwrap().into(), yesterday)
            .unwrap();
        t.log_meal(&boo(), t.calculate("paneer", 50.0, "lunch").unwrap().into(), today())
            .unwrap();
        t.log_weight(&boo(), None, 67.3, today()).unwrap();
        t.set_goal(
            &boo(),
            &GoalRequest {
                current_weight: 67.3,
                goal_type: GoalType::Lose,
                goal_rate: 0.5,
            },
        )
        .unwrap();

        let dash = t.dashboard(&boo(), today()).unwrap();
        assert_eq!(dash.streak, 2);
        assert_eq!(dash.calories_per_day["2025-11-07"], 105);
        assert_eq!(dash.consumed, 132);
        assert!((dash.remaining - 1518.0).abs() < f64::EPSILON);
        assert!(dash.goal_hits["2025-11-07"]);
        assert_eq!(dash.latest_weight.unwrap().date, "2025-11-08");

        let home = t.home(&boo(), today()).unwrap();
        assert_eq!(home.today_meals.len(), 1);
        assert_eq!(home.foods.len(), t.catalog().len());
    }

    fn file_tracker(dir: &std::path::Path) -> Tracker {
        let store = crate::store::JsonFileStore::open(dir).unwrap();
        Tracker::new(Arc::new(store), FoodCatalog::builtin())
    }

    #[test]
    fn test_log_weight_keeps_odd_values_already_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boo_weights.json");
        std::fs::write(
            &path,
            r#"{"2025-11-01": 70.0, "2025-11-02": 69.5, "2025-11-03": "69"}"#,
        )
        .unwrap();

        let t = file_tracker(dir.path());
        t.log_weight(&boo(), Some("2025-11-08"), 68.0, today()).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["2025-11-01"], json!(70.0));
        assert_eq!(raw["2025-11-03"], json!("69"));
        assert_eq!(raw["2025-11-08"], json!(68.0));

        let latest = t.dashboard(&boo(), today()).unwrap().latest_weight.unwrap();
        assert_eq!(latest.date, "2025-11-08");
    }

    #[test]
    fn test_log_meal_keeps_odd_entries_already_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boo_meals.json");
        std::fs::write(
            &path,
            r#"{
                "2025-11-01": [{"meal": "lunch", "food": "idli", "amount": "3", "calories": 105}],
                "2025-11-02": [{"food": "dosa", "calories": 133.0}]
            }"#,
        )
        .unwrap();

        let t = file_tracker(dir.path());
        t.log_meal(&boo(), t.calculate("vada", 1.0, "snack").unwrap().into(), today())
            .unwrap();

        let meals = t.meals(&boo()).unwrap();
        assert_eq!(meals.len(), 3);
        assert_eq!(meals["2025-11-01"][0].amount, json!("3"));
        assert_eq!(meals["2025-11-02"][0].calorie_count(), 133);
    }

    #[test]
    fn test_mutation_refuses_to_overwrite_unreadable_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boo_meals.json");
        let original = r#"{"2025-11-01": {"not": "a list"}}"#;
        std::fs::write(&path, original).unwrap();

        let t = file_tracker(dir.path());
        let entry = MealEntry {
            calories: json!(100),
            ..MealEntry::default()
        };
        assert!(t.log_meal(&boo(), entry, today()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_huge_calories_do_not_break_dashboard() {
        let t = tracker();
        for _ in 0..2 {
            let entry = MealEntry {
                calories: json!(1e300),
                ..MealEntry::default()
            };
            t.log_meal(&boo(), entry, today()).unwrap();
        }
        let dash = t.dashboard(&boo(), today()).unwrap();
        assert_eq!(dash.consumed, i64::MAX);
        assert_eq!(t.home(&boo(), today()).unwrap().consumed, i64::MAX);
    }
}

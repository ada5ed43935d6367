use anyhow::Result;
use chrono::NaiveDate;

use lighter_core::models::{MealEntry, Username};
use lighter_core::tracker::Tracker;

use super::helpers::{parse_date, print_json};

pub(crate) struct LogArgs<'a> {
    pub food: &'a str,
    pub amount: f64,
    pub meal: &'a str,
    pub date: Option<&'a str>,
}

pub(crate) fn cmd_log(
    tracker: &Tracker,
    user: &Username,
    args: &LogArgs<'_>,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let estimate = tracker.calculate(args.food, args.amount, args.meal)?;
    let calories = estimate.calories;

    let mut entry = MealEntry::from(estimate);
    entry.date = Some(parse_date(args.date, today)?);
    let date = tracker.log_meal(user, entry.clone(), today)?;
    entry.date = Some(date.clone());

    if json {
        print_json(&entry)
    } else {
        println!(
            "Logged {} {} ({calories:.0} kcal) to {} on {date}",
            args.amount,
            entry.food_name().unwrap_or_default(),
            entry.meal_name().unwrap_or_default(),
        );
        Ok(())
    }
}

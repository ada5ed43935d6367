use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::Serialize;

use lighter_core::models::Username;
use lighter_core::tracker::Tracker;

use super::helpers::{parse_date, print_json};

#[derive(Serialize)]
struct WeightLogged {
    date: String,
    weight: f64,
}

pub(crate) fn cmd_weight_log(
    tracker: &Tracker,
    user: &Username,
    value: f64,
    date: Option<&str>,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    if !value.is_finite() {
        bail!("Weight must be a number");
    }

    let date = parse_date(date, today)?;
    let date = tracker.log_weight(user, Some(date.as_str()), value, today)?;

    if json {
        print_json(&WeightLogged {
            date,
            weight: value,
        })
    } else {
        println!("Logged {value:.1} kg for {date}");
        Ok(())
    }
}

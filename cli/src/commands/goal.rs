use anyhow::Result;

use lighter_core::goal::GoalRequest;
use lighter_core::models::Username;
use lighter_core::tracker::Tracker;

use super::helpers::print_json;

pub(crate) fn cmd_goal_set(
    tracker: &Tracker,
    user: &Username,
    req: &GoalRequest,
    json: bool,
) -> Result<()> {
    let record = tracker.set_goal(user, req)?;

    if json {
        print_json(&record)
    } else {
        println!(
            "Goal saved: {} {} kg/week from {:.1} kg",
            record.goal_type, record.goal_rate, record.current_weight
        );
        println!("  Daily target: {:.0} kcal", record.daily_goal);
        Ok(())
    }
}

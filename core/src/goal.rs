use std::fmt;

use serde::{Deserialize, Serialize};

/// Maintenance intake assumed for every user, kcal/day.
pub const BASELINE_KCAL: f64 = 2200.0;

/// Daily kcal adjustment per kg/week of desired change (0.5 kg/week => 550 kcal/day).
pub const KCAL_PER_WEEKLY_KG: f64 = 1100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Lose,
    Gain,
}

impl GoalType {
    /// Whether a day's intake satisfies the goal direction.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_hit(self, consumed: i64, daily_goal: f64) -> bool {
        let consumed = consumed as f64;
        match self {
            Self::Lose => consumed <= daily_goal,
            Self::Gain => consumed >= daily_goal,
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lose => f.write_str("lose"),
            Self::Gain => f.write_str("gain"),
        }
    }
}

impl std::str::FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lose" => Ok(Self::Lose),
            "gain" => Ok(Self::Gain),
            _ => Err(format!("Invalid goal type '{s}'. Use 'lose' or 'gain'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GoalRequest {
    pub current_weight: f64,
    pub goal_type: GoalType,
    pub goal_rate: f64,
}

/// The user's single active goal. Replaced wholesale on every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub current_weight: f64,
    pub goal_type: GoalType,
    pub goal_rate: f64,
    pub daily_goal: f64,
}

impl GoalRecord {
    #[must_use]
    pub fn from_request(req: &GoalRequest) -> Self {
        Self {
            current_weight: req.current_weight,
            goal_type: req.goal_type,
            goal_rate: req.goal_rate,
            daily_goal: daily_goal(req.goal_type, req.goal_rate),
        }
    }
}

/// Daily calorie target for losing or gaining `goal_rate` kg per week.
///
/// Not personalised: every user starts from the same [`BASELINE_KCAL`].
#[must_use]
pub fn daily_goal(goal_type: GoalType, goal_rate: f64) -> f64 {
    let adjustment = goal_rate * KCAL_PER_WEEKLY_KG;
    let goal = match goal_type {
        GoalType::Lose => BASELINE_KCAL - adjustment,
        GoalType::Gain => BASELINE_KCAL + adjustment,
    };
    goal.round_ties_even()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lose_half_kg_per_week() {
        let record = GoalRecord::from_request(&GoalRequest {
            current_weight: 70.0,
            goal_type: GoalType::Lose,
            goal_rate: 0.5,
        });
        assert!((record.daily_goal - 1650.0).abs() < f64::EPSILON);
        assert!((record.current_weight - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gain_half_kg_per_week() {
        assert!((daily_goal(GoalType::Gain, 0.5) - 2750.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_goal_rounds_to_integer() {
        // 2200 - 0.33 * 1100 = 1837
        assert!((daily_goal(GoalType::Lose, 0.33) - 1837.0).abs() < f64::EPSILON);
        // 2200 + 0.2501 * 1100 = 2475.11
        assert!((daily_goal(GoalType::Gain, 0.2501) - 2475.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_goal_half_rounds_to_even() {
        // 0.125 * 1100 = 137.5
        assert!((daily_goal(GoalType::Lose, 0.125) - 2062.0).abs() < f64::EPSILON);
        assert!((daily_goal(GoalType::Gain, 0.125) - 2338.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_goal_hit_direction() {
        assert!(GoalType::Lose.is_hit(1650, 1650.0));
        assert!(!GoalType::Lose.is_hit(1651, 1650.0));
        assert!(GoalType::Gain.is_hit(2750, 2750.0));
        assert!(!GoalType::Gain.is_hit(2000, 2750.0));
    }

    #[test]
    fn test_goal_type_parse_and_serde() {
        assert_eq!("LOSE".parse::<GoalType>().unwrap(), GoalType::Lose);
        assert!("maintain".parse::<GoalType>().is_err());
        assert_eq!(serde_json::to_string(&GoalType::Gain).unwrap(), "\"gain\"");
    }

    #[test]
    fn test_goal_record_reads_stored_float_goal() {
        let record: GoalRecord = serde_json::from_str(
            r#"{"current_weight": 70.0, "goal_type": "lose", "goal_rate": 0.5, "daily_goal": 1650.0}"#,
        )
        .unwrap();
        assert_eq!(record.goal_type, GoalType::Lose);
        assert!((record.daily_goal - 1650.0).abs() < f64::EPSILON);
    }
}

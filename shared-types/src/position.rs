use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Position {
    pub id: i64,
    pub position_code: String,
    pub position_title: Option<String>,
    pub hours_per_assignment: f64,
    pub desired_num_assignments: i64,
}

impl Position {
    /// Total hours this position wants filled, rounded to 2 decimals.
    pub fn target_hours(&self) -> f64 {
        round_hours(self.hours_per_assignment * self.desired_num_assignments as f64)
    }
}

/// Round an hour amount to 2 decimal places.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PositionsResponse {
    pub positions: Vec<Position>,
}

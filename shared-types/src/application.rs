use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How strongly an applicant wants a given position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PositionPreference {
    pub position_id: i64,
    pub position_code: String,
    pub preference_level: i32,
}

/// An instructor's rating of an applicant for one of their positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstructorPreference {
    pub position_id: i64,
    pub position_code: String,
    pub preference_level: i32,
    pub comment: Option<String>,
}

/// One application submitted by an applicant through a posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Application {
    pub id: i64,
    pub applicant_id: i64,
    pub posting_id: Option<i64>,
    /// RFC 3339 timestamp
    pub submission_date: Option<String>,
    #[serde(default)]
    pub position_preferences: Vec<PositionPreference>,
    #[serde(default)]
    pub instructor_preferences: Vec<InstructorPreference>,
}

impl Application {
    pub fn preference_for(&self, position_id: i64) -> Option<&PositionPreference> {
        self.position_preferences
            .iter()
            .find(|pref| pref.position_id == position_id)
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ApplicationsResponse {
    pub applications: Vec<Application>,
}

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Hours owed to an applicant for one session, plus matching visibility.
///
/// Keyed by `(applicant_id, session_id)`. `id` stays `None` until the record
/// has been written once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApplicantMatchingDatum {
    pub id: Option<i64>,
    pub applicant_id: i64,
    pub session_id: i64,
    pub min_hours_owed: Option<f64>,
    pub max_hours_owed: Option<f64>,
    pub prev_hours_fulfilled: Option<f64>,
    /// Hidden from matching for every position
    #[serde(default)]
    pub hidden: bool,
    pub note: Option<String>,
}

impl ApplicantMatchingDatum {
    /// Blank datum used when nothing has been recorded for the applicant yet
    pub fn empty(applicant_id: i64, session_id: i64) -> Self {
        Self {
            id: None,
            applicant_id,
            session_id,
            min_hours_owed: None,
            max_hours_owed: None,
            prev_hours_fulfilled: None,
            hidden: false,
            note: None,
        }
    }
}

/// A staged, not yet committed decision for one applicant and position.
///
/// Keyed by `(applicant_id, position_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Match {
    pub id: Option<i64>,
    pub applicant_id: i64,
    pub position_id: i64,
    #[serde(default)]
    pub assigned: bool,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub hours_assigned: f64,
}

impl Match {
    pub fn new(applicant_id: i64, position_id: i64) -> Self {
        Self {
            id: None,
            applicant_id,
            position_id,
            assigned: false,
            starred: false,
            hidden: false,
            hours_assigned: 0.0,
        }
    }

    /// A match with no flag set carries no decision.
    pub fn is_active(&self) -> bool {
        self.assigned || self.starred || self.hidden
    }
}

/// Classification of one applicant against one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    Assigned,
    Unassignable,
    StagedAssigned,
    Starred,
    Hidden,
    Applied,
    #[serde(rename = "n/a")]
    NotApplicable,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 7] = [
        MatchStatus::Assigned,
        MatchStatus::StagedAssigned,
        MatchStatus::Starred,
        MatchStatus::Applied,
        MatchStatus::NotApplicable,
        MatchStatus::Unassignable,
        MatchStatus::Hidden,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Assigned => "assigned",
            MatchStatus::Unassignable => "unassignable",
            MatchStatus::StagedAssigned => "staged-assigned",
            MatchStatus::Starred => "starred",
            MatchStatus::Hidden => "hidden",
            MatchStatus::Applied => "applied",
            MatchStatus::NotApplicable => "n/a",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How assigned hours compare against a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum FillStatus {
    #[serde(rename = "n/a")]
    NotApplicable,
    Empty,
    Under,
    Matched,
    Over,
}

impl FillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FillStatus::NotApplicable => "n/a",
            FillStatus::Empty => "empty",
            FillStatus::Under => "under",
            FillStatus::Matched => "matched",
            FillStatus::Over => "over",
        }
    }
}

impl fmt::Display for FillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Matching error types
#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error("No match target for applicant {applicant_id} and position {position_id}")]
    InvalidReference { applicant_id: i64, position_id: i64 },

    #[error("Unknown applicant: {0}")]
    UnknownApplicant(i64),

    #[error("Unknown position: {0}")]
    UnknownPosition(i64),

    #[error("Invalid hours for a staged assignment: {0}")]
    InvalidHours(f64),

    #[error("No active session")]
    NoActiveSession,
}

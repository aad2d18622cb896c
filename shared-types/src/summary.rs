use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{
    Applicant, ApplicantMatchingDatum, Application, Assignment, FillStatus, Match, MatchStatus,
    Position,
};

/// Everything the matching view knows about one applicant in the active session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApplicantSummary {
    pub applicant: Applicant,
    pub applicant_matching_datum: ApplicantMatchingDatum,
    /// Consolidated across postings
    pub application: Option<Application>,
    pub matches: Vec<Match>,
    pub assignments: Vec<Assignment>,
    pub total_hours_assigned: f64,
    pub filled_status: FillStatus,
}

impl ApplicantSummary {
    pub fn applicant_id(&self) -> i64 {
        self.applicant.id
    }

    pub fn match_for(&self, position_id: i64) -> Option<&Match> {
        self.matches.iter().find(|m| m.position_id == position_id)
    }

    pub fn assignment_for(&self, position_id: i64) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.position_id == position_id)
    }

    /// Hours still available under `max_hours_owed`, if a maximum is recorded
    pub fn hours_remaining(&self) -> Option<f64> {
        self.applicant_matching_datum
            .max_hours_owed
            .map(|max| crate::position::round_hours(max - self.total_hours_assigned))
    }
}

/// Fill state of one position and the applicants relevant to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PositionSummary {
    pub position: Position,
    pub hours_assigned: f64,
    pub filled_status: FillStatus,
    pub applicant_summaries: Vec<ApplicantSummary>,
}

/// Applicant counts per match status for one position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PositionFillStats {
    pub position_id: i64,
    pub assigned: usize,
    pub unassignable: usize,
    pub staged_assigned: usize,
    pub starred: usize,
    pub hidden: usize,
    pub applied: usize,
    pub not_applicable: usize,
}

impl PositionFillStats {
    pub fn record(&mut self, status: MatchStatus) {
        let slot = match status {
            MatchStatus::Assigned => &mut self.assigned,
            MatchStatus::Unassignable => &mut self.unassignable,
            MatchStatus::StagedAssigned => &mut self.staged_assigned,
            MatchStatus::Starred => &mut self.starred,
            MatchStatus::Hidden => &mut self.hidden,
            MatchStatus::Applied => &mut self.applied,
            MatchStatus::NotApplicable => &mut self.not_applicable,
        };
        *slot += 1;
    }

    pub fn get(&self, status: MatchStatus) -> usize {
        match status {
            MatchStatus::Assigned => self.assigned,
            MatchStatus::Unassignable => self.unassignable,
            MatchStatus::StagedAssigned => self.staged_assigned,
            MatchStatus::Starred => self.starred,
            MatchStatus::Hidden => self.hidden,
            MatchStatus::Applied => self.applied,
            MatchStatus::NotApplicable => self.not_applicable,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PositionSummariesResponse {
    pub position_summaries: Vec<PositionSummary>,
}

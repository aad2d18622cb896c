use std::cmp::Ordering;

use shared_types::{ApplicantSummary, MatchStatus, Position};

use crate::status::{get_match_status, preference_level};

/// Display rank of a status within a position's applicant list
pub fn status_rank(status: MatchStatus) -> u8 {
    match status {
        MatchStatus::Assigned => 0,
        MatchStatus::StagedAssigned => 1,
        MatchStatus::Starred => 2,
        MatchStatus::Applied => 3,
        MatchStatus::NotApplicable => 4,
        MatchStatus::Unassignable => 5,
        MatchStatus::Hidden => 6,
    }
}

/// Order applicants for a position: by status rank, then strongest
/// preference first, then last and first name.
pub fn sort_for_position(summaries: &mut [ApplicantSummary], position: &Position) {
    summaries.sort_by(|a, b| compare_for_position(a, b, position));
}

pub fn compare_for_position(
    a: &ApplicantSummary,
    b: &ApplicantSummary,
    position: &Position,
) -> Ordering {
    status_rank(get_match_status(a, position))
        .cmp(&status_rank(get_match_status(b, position)))
        .then_with(|| preference_level(b, position).cmp(&preference_level(a, position)))
        .then_with(|| a.applicant.last_name.cmp(&b.applicant.last_name))
        .then_with(|| a.applicant.first_name.cmp(&b.applicant.first_name))
}

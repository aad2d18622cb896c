//! Classify an applicant against a position.
//!
//! Committed assignments always outrank staged matches, and an explicit
//! staged decision outranks the global hide flag and application preferences.

use shared_types::{ApplicantSummary, Assignment, MatchStatus, Position};

/// The assignment that decides the pair. A live assignment is preferred over
/// a void one when both exist.
pub fn assignment_for<'a>(summary: &'a ApplicantSummary, position: &Position) -> Option<&'a Assignment> {
    let mut candidates = summary
        .assignments
        .iter()
        .filter(|a| a.position_id == position.id);
    let first = candidates.next()?;
    if !first.is_void() {
        return Some(first);
    }
    Some(candidates.find(|a| !a.is_void()).unwrap_or(first))
}

pub fn get_match_status(summary: &ApplicantSummary, position: &Position) -> MatchStatus {
    if let Some(assignment) = assignment_for(summary, position) {
        return if assignment.is_void() {
            MatchStatus::Unassignable
        } else {
            MatchStatus::Assigned
        };
    }

    if let Some(staged) = summary.match_for(position.id) {
        if staged.assigned {
            return MatchStatus::StagedAssigned;
        }
        if staged.starred {
            return MatchStatus::Starred;
        }
        if staged.hidden {
            return MatchStatus::Hidden;
        }
    }

    if summary.applicant_matching_datum.hidden {
        return MatchStatus::Hidden;
    }

    let applied = summary
        .application
        .as_ref()
        .and_then(|app| app.preference_for(position.id))
        .is_some();
    if applied {
        return MatchStatus::Applied;
    }

    MatchStatus::NotApplicable
}

/// Hours the applicant holds on the position: committed hours first, staged
/// hours only without any assignment.
pub fn get_hours_assigned(summary: &ApplicantSummary, position: &Position) -> f64 {
    if let Some(assignment) = assignment_for(summary, position) {
        return assignment.effective_hours();
    }

    match summary.match_for(position.id) {
        Some(staged) if staged.assigned => staged.hours_assigned,
        _ => 0.0,
    }
}

/// Preference level the applicant gave the position, 0 when none.
pub fn preference_level(summary: &ApplicantSummary, position: &Position) -> i32 {
    summary
        .application
        .as_ref()
        .and_then(|app| app.preference_for(position.id))
        .map(|pref| pref.preference_level)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{applicant_summary, assignment, position, staged_match, with_preference};
    use shared_types::OfferStatus;

    #[test]
    fn test_assignment_outranks_match() {
        let p = position(1, "CSC108H1F", 10.0, 1);
        let mut summary = applicant_summary(1);
        summary.assignments = vec![assignment(1, 1, 1, 10.0, Some(OfferStatus::Accepted))];
        summary.matches = vec![staged_match(1, 1, true, 5.0)];

        assert_eq!(get_hours_assigned(&summary, &p), 10.0);
        assert_eq!(get_match_status(&summary, &p), MatchStatus::Assigned);
    }

    #[test]
    fn test_rejected_assignment_is_unassignable() {
        let p = position(1, "CSC108H1F", 10.0, 1);
        let mut summary = applicant_summary(1);
        summary.assignments = vec![assignment(1, 1, 1, 10.0, Some(OfferStatus::Rejected))];

        assert_eq!(get_match_status(&summary, &p), MatchStatus::Unassignable);
        assert_eq!(get_hours_assigned(&summary, &p), 0.0);
    }

    #[test]
    fn test_withdrawn_assignment_hides_staged_hours() {
        let p = position(1, "CSC108H1F", 10.0, 1);
        let mut summary = applicant_summary(1);
        summary.assignments = vec![assignment(1, 1, 1, 10.0, Some(OfferStatus::Withdrawn))];
        summary.matches = vec![staged_match(1, 1, true, 5.0)];

        assert_eq!(get_match_status(&summary, &p), MatchStatus::Unassignable);
        assert_eq!(get_hours_assigned(&summary, &p), 0.0);
    }

    #[test]
    fn test_live_assignment_preferred_over_void() {
        let p = position(1, "CSC108H1F", 10.0, 1);
        let mut summary = applicant_summary(1);
        summary.assignments = vec![
            assignment(1, 1, 1, 10.0, Some(OfferStatus::Rejected)),
            assignment(2, 1, 1, 6.0, Some(OfferStatus::Pending)),
        ];

        assert_eq!(get_match_status(&summary, &p), MatchStatus::Assigned);
        assert_eq!(get_hours_assigned(&summary, &p), 6.0);
    }

    #[test]
    fn test_staged_flags_in_priority_order() {
        let p = position(1, "CSC108H1F", 10.0, 1);
        let mut summary = applicant_summary(1);

        let mut m = staged_match(1, 1, false, 0.0);
        m.starred = true;
        m.hidden = true;
        summary.matches = vec![m.clone()];
        assert_eq!(get_match_status(&summary, &p), MatchStatus::Starred);

        m.starred = false;
        summary.matches = vec![m.clone()];
        assert_eq!(get_match_status(&summary, &p), MatchStatus::Hidden);

        m.assigned = true;
        summary.matches = vec![m];
        assert_eq!(get_match_status(&summary, &p), MatchStatus::StagedAssigned);
    }

    #[test]
    fn test_empty_match_falls_through() {
        let p = position(1, "CSC108H1F", 10.0, 1);
        let mut summary = with_preference(applicant_summary(1), &p, 2);
        summary.matches = vec![staged_match(1, 1, false, 0.0)];

        assert_eq!(get_match_status(&summary, &p), MatchStatus::Applied);
    }

    #[test]
    fn test_global_hide_beats_application() {
        let p = position(1, "CSC108H1F", 10.0, 1);
        let mut summary = with_preference(applicant_summary(1), &p, 2);
        summary.applicant_matching_datum.hidden = true;

        assert_eq!(get_match_status(&summary, &p), MatchStatus::Hidden);
    }

    #[test]
    fn test_global_hide_does_not_override_staged() {
        let p = position(1, "CSC108H1F", 10.0, 1);
        let mut summary = applicant_summary(1);
        summary.applicant_matching_datum.hidden = true;
        let mut m = staged_match(1, 1, false, 0.0);
        m.starred = true;
        summary.matches = vec![m];

        assert_eq!(get_match_status(&summary, &p), MatchStatus::Starred);
    }

    #[test]
    fn test_no_relation_is_not_applicable() {
        let p = position(1, "CSC108H1F", 10.0, 1);
        let other = position(2, "CSC148H1S", 10.0, 1);
        let summary = with_preference(applicant_summary(1), &other, 3);

        assert_eq!(get_match_status(&summary, &p), MatchStatus::NotApplicable);
        assert_eq!(get_hours_assigned(&summary, &p), 0.0);
        assert_eq!(preference_level(&summary, &other), 3);
        assert_eq!(preference_level(&summary, &p), 0);
    }

    #[test]
    fn test_unassigned_match_contributes_no_hours() {
        let p = position(1, "CSC108H1F", 10.0, 1);
        let mut summary = applicant_summary(1);
        let mut m = staged_match(1, 1, false, 8.0);
        m.starred = true;
        summary.matches = vec![m];

        assert_eq!(get_hours_assigned(&summary, &p), 0.0);
    }
}

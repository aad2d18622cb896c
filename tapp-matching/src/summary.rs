//! Join the source collections into per-applicant and per-position summaries.
//!
//! Everything here is a pure function of its inputs. Collections that have
//! not loaded yet are simply empty slices.

use std::collections::{BTreeMap, HashMap, HashSet};

use shared_types::{
    round_hours, Applicant, ApplicantMatchingDatum, ApplicantSummary, Application, Assignment,
    Match, Position, PositionFillStats, PositionSummary,
};

use crate::fill::{applicant_fill_status, position_fill_status};
use crate::index::{by_key, group_by};
use crate::status::{get_hours_assigned, get_match_status};

/// Build one summary per applicant for the active session.
///
/// Returns nothing without an active session. Applicants with no matching
/// datum for the session get a blank one; data for other sessions is ignored.
pub fn build_applicant_summaries(
    applicants: &[Applicant],
    assignments: &[Assignment],
    matching_data: &[ApplicantMatchingDatum],
    matches: &[Match],
    consolidated_applications: &HashMap<i64, Application>,
    active_session: Option<i64>,
) -> Vec<ApplicantSummary> {
    let Some(session_id) = active_session else {
        tracing::debug!("No active session; skipping applicant summaries");
        return Vec::new();
    };

    let assignments_by_applicant = group_by(assignments, |a| a.applicant_id);
    let matches_by_applicant = group_by(matches, |m| m.applicant_id);
    let data_by_applicant = by_key(
        matching_data.iter().filter(|d| d.session_id == session_id),
        |d| d.applicant_id,
    );

    applicants
        .iter()
        .map(|applicant| {
            let assignments: Vec<Assignment> = assignments_by_applicant
                .get(&applicant.id)
                .map(|list| list.iter().map(|a| (*a).clone()).collect())
                .unwrap_or_default();
            let matches: Vec<Match> = matches_by_applicant
                .get(&applicant.id)
                .map(|list| list.iter().map(|m| (*m).clone()).collect())
                .unwrap_or_default();
            let datum = data_by_applicant
                .get(&applicant.id)
                .map(|d| (*d).clone())
                .unwrap_or_else(|| ApplicantMatchingDatum::empty(applicant.id, session_id));

            let total_hours_assigned = applicant_hours_assigned(&assignments, &matches);
            let filled_status =
                applicant_fill_status(datum.min_hours_owed.unwrap_or(0.0), total_hours_assigned);

            ApplicantSummary {
                applicant: applicant.clone(),
                applicant_matching_datum: datum,
                application: consolidated_applications.get(&applicant.id).cloned(),
                matches,
                assignments,
                total_hours_assigned,
                filled_status,
            }
        })
        .collect()
}

/// Live assignment hours plus staged hours on positions with no live
/// assignment, so a finalized match is never counted twice.
fn applicant_hours_assigned(assignments: &[Assignment], matches: &[Match]) -> f64 {
    let covered: HashSet<i64> = assignments
        .iter()
        .filter(|a| !a.is_void())
        .map(|a| a.position_id)
        .collect();

    let committed: f64 = assignments.iter().map(Assignment::effective_hours).sum();
    let staged: f64 = matches
        .iter()
        .filter(|m| m.assigned && !covered.contains(&m.position_id))
        .map(|m| m.hours_assigned)
        .sum();

    round_hours(committed + staged)
}

/// Whether an applicant belongs on a position's list: assigned to it, holding
/// an active staged match for it, or having expressed a nonzero preference.
pub fn is_relevant(summary: &ApplicantSummary, position: &Position) -> bool {
    if summary
        .assignments
        .iter()
        .any(|a| a.position_id == position.id)
    {
        return true;
    }
    if summary
        .matches
        .iter()
        .any(|m| m.position_id == position.id && m.is_active())
    {
        return true;
    }
    summary
        .application
        .as_ref()
        .map(|app| {
            app.position_preferences
                .iter()
                .any(|p| p.position_id == position.id && p.preference_level != 0)
        })
        .unwrap_or(false)
}

/// Build a summary for every position, keyed by position id.
pub fn build_position_summaries(
    positions: &[Position],
    applicant_summaries: &[ApplicantSummary],
) -> BTreeMap<i64, PositionSummary> {
    positions
        .iter()
        .map(|position| (position.id, build_position_summary(position, applicant_summaries)))
        .collect()
}

pub fn build_position_summary(
    position: &Position,
    applicant_summaries: &[ApplicantSummary],
) -> PositionSummary {
    let mut seen = HashSet::new();
    let relevant: Vec<ApplicantSummary> = applicant_summaries
        .iter()
        .filter(|summary| is_relevant(summary, position))
        .filter(|summary| seen.insert(summary.applicant_id()))
        .cloned()
        .collect();

    let hours_assigned = round_hours(
        relevant
            .iter()
            .map(|summary| get_hours_assigned(summary, position))
            .sum(),
    );

    PositionSummary {
        position: position.clone(),
        hours_assigned,
        filled_status: position_fill_status(position.target_hours(), hours_assigned),
        applicant_summaries: relevant,
    }
}

/// Count a position's applicants by match status.
pub fn fill_stats(summary: &PositionSummary) -> PositionFillStats {
    let mut stats = PositionFillStats {
        position_id: summary.position.id,
        ..Default::default()
    };
    for applicant in &summary.applicant_summaries {
        stats.record(get_match_status(applicant, &summary.position));
    }
    stats
}

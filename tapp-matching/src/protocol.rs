//! Staged edits (assign, star, hide) and finalizing them into assignments.
//!
//! Each toggle reads the applicant's current match for the position, creating
//! a blank one if there is none, flips a single field and upserts the whole
//! record. Finalize is the only path from a staged match to an assignment.

use anyhow::Result;
use shared_types::{
    Applicant, ApplicantMatchingDatum, ApplicantSummary, Assignment, CreateAssignmentRequest, Match,
    MatchingError, Position,
};
use std::collections::HashSet;

use crate::index::{by_id, match_key};
use crate::store::MatchingStore;

fn ensure_target(summary: &ApplicantSummary, position: &Position) -> Result<(), MatchingError> {
    let applicant_id = summary.applicant_id();
    let consistent = summary
        .matches
        .iter()
        .all(|m| m.applicant_id == applicant_id);

    if applicant_id <= 0 || position.id <= 0 || !consistent {
        return Err(MatchingError::InvalidReference {
            applicant_id,
            position_id: position.id,
        });
    }
    Ok(())
}

fn find_or_create(summary: &ApplicantSummary, position: &Position) -> Result<Match, MatchingError> {
    ensure_target(summary, position)?;
    Ok(summary
        .match_for(position.id)
        .cloned()
        .unwrap_or_else(|| Match::new(summary.applicant_id(), position.id)))
}

/// The match `toggle_assigned` would write. Un-assigning always clears the
/// staged hours.
pub fn plan_toggle_assigned(
    summary: &ApplicantSummary,
    position: &Position,
    hours_assigned: f64,
) -> Result<Match, MatchingError> {
    if !hours_assigned.is_finite() || hours_assigned < 0.0 {
        return Err(MatchingError::InvalidHours(hours_assigned));
    }

    let mut staged = find_or_create(summary, position)?;
    staged.assigned = !staged.assigned;
    staged.hours_assigned = if staged.assigned { hours_assigned } else { 0.0 };
    Ok(staged)
}

pub fn plan_toggle_starred(summary: &ApplicantSummary, position: &Position) -> Result<Match, MatchingError> {
    let mut staged = find_or_create(summary, position)?;
    staged.starred = !staged.starred;
    Ok(staged)
}

pub fn plan_toggle_hidden(summary: &ApplicantSummary, position: &Position) -> Result<Match, MatchingError> {
    let mut staged = find_or_create(summary, position)?;
    staged.hidden = !staged.hidden;
    Ok(staged)
}

pub fn plan_toggle_applicant_hidden(datum: &ApplicantMatchingDatum) -> ApplicantMatchingDatum {
    ApplicantMatchingDatum {
        hidden: !datum.hidden,
        ..datum.clone()
    }
}

pub async fn toggle_assigned<S: MatchingStore + ?Sized>(
    store: &S,
    summary: &ApplicantSummary,
    position: &Position,
    hours_assigned: f64,
) -> Result<Match> {
    let staged = plan_toggle_assigned(summary, position, hours_assigned)?;
    tracing::info!(
        applicant_id = staged.applicant_id,
        position_id = staged.position_id,
        assigned = staged.assigned,
        hours = staged.hours_assigned,
        "Toggling staged assignment"
    );
    store.upsert_match(staged).await
}

pub async fn toggle_starred<S: MatchingStore + ?Sized>(
    store: &S,
    summary: &ApplicantSummary,
    position: &Position,
) -> Result<Match> {
    let staged = plan_toggle_starred(summary, position)?;
    tracing::info!(
        applicant_id = staged.applicant_id,
        position_id = staged.position_id,
        starred = staged.starred,
        "Toggling star"
    );
    store.upsert_match(staged).await
}

pub async fn toggle_hidden<S: MatchingStore + ?Sized>(
    store: &S,
    summary: &ApplicantSummary,
    position: &Position,
) -> Result<Match> {
    let staged = plan_toggle_hidden(summary, position)?;
    tracing::info!(
        applicant_id = staged.applicant_id,
        position_id = staged.position_id,
        hidden = staged.hidden,
        "Toggling hidden"
    );
    store.upsert_match(staged).await
}

pub async fn toggle_applicant_hidden<S: MatchingStore + ?Sized>(
    store: &S,
    datum: &ApplicantMatchingDatum,
) -> Result<ApplicantMatchingDatum> {
    let updated = plan_toggle_applicant_hidden(datum);
    tracing::info!(
        applicant_id = updated.applicant_id,
        session_id = updated.session_id,
        hidden = updated.hidden,
        "Toggling applicant hidden"
    );
    store.upsert_applicant_matching_datum(updated).await
}

/// Assigned matches with no assignment of any status for the same pair
pub fn staged_assignments<'a>(matches: &'a [Match], assignments: &[Assignment]) -> Vec<&'a Match> {
    let committed: HashSet<(i64, i64)> = assignments
        .iter()
        .map(|a| (a.applicant_id, a.position_id))
        .collect();

    matches
        .iter()
        .filter(|m| m.assigned && !committed.contains(&match_key(m)))
        .collect()
}

/// The requests Finalize would issue
pub fn staged_assignment_requests(
    matches: &[Match],
    assignments: &[Assignment],
) -> Vec<CreateAssignmentRequest> {
    staged_assignments(matches, assignments)
        .into_iter()
        .map(|m| CreateAssignmentRequest {
            applicant_id: m.applicant_id,
            position_id: m.position_id,
            hours: m.hours_assigned,
        })
        .collect()
}

/// Fail on the first request naming an applicant or position that does not
/// exist.
pub fn check_references(
    requests: &[CreateAssignmentRequest],
    applicants: &[Applicant],
    positions: &[Position],
) -> Result<(), MatchingError> {
    let known_applicants = by_id(applicants);
    let known_positions = by_id(positions);

    match requests.iter().find(|r| {
        !known_applicants.contains_key(&r.applicant_id)
            || !known_positions.contains_key(&r.position_id)
    }) {
        Some(bad) => Err(MatchingError::InvalidReference {
            applicant_id: bad.applicant_id,
            position_id: bad.position_id,
        }),
        None => Ok(()),
    }
}

/// Commit every staged assignment.
///
/// Matches and assignments are re-read from the store first. If any staged
/// match points at an unknown applicant or position nothing is written.
pub async fn finalize<S: MatchingStore + ?Sized>(store: &S) -> Result<Vec<Assignment>> {
    let (matches, assignments, applicants, positions) = tokio::try_join!(
        store.fetch_matches(),
        store.fetch_assignments(),
        store.fetch_applicants(),
        store.fetch_positions(),
    )?;

    let requests = staged_assignment_requests(&matches, &assignments);
    check_references(&requests, &applicants, &positions)?;

    tracing::info!("Finalizing {} staged assignments", requests.len());

    let mut created = Vec::with_capacity(requests.len());
    for request in requests {
        let assignment = store.upsert_assignment(request).await?;
        tracing::debug!(
            assignment_id = assignment.id,
            applicant_id = assignment.applicant_id,
            position_id = assignment.position_id,
            "Created assignment from staged match"
        );
        created.push(assignment);
    }
    Ok(created)
}

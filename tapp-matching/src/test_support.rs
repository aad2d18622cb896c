//! Fixtures shared by the unit tests.

use shared_types::{
    Applicant, ApplicantMatchingDatum, ApplicantSummary, Application, Assignment, FillStatus,
    Match, OfferStatus, Position, PositionPreference, Session,
};

use crate::snapshot::MatchingSnapshot;

pub const SESSION_ID: i64 = 1;

pub fn session() -> Session {
    Session {
        id: SESSION_ID,
        name: "2024 Fall".to_string(),
        start_date: Some("2024-09-01".to_string()),
        end_date: Some("2024-12-31".to_string()),
    }
}

pub fn applicant(id: i64) -> Applicant {
    Applicant {
        id,
        utorid: format!("user{id}"),
        first_name: format!("First{id}"),
        last_name: format!("Last{id}"),
        student_number: Some(format!("100{id:06}")),
        email: Some(format!("user{id}@mail.utoronto.ca")),
    }
}

pub fn position(id: i64, code: &str, hours_per_assignment: f64, desired: i64) -> Position {
    Position {
        id,
        position_code: code.to_string(),
        position_title: None,
        hours_per_assignment,
        desired_num_assignments: desired,
    }
}

pub fn assignment(
    id: i64,
    applicant_id: i64,
    position_id: i64,
    hours: f64,
    status: Option<OfferStatus>,
) -> Assignment {
    Assignment {
        id,
        applicant_id,
        position_id,
        hours,
        active_offer_status: status,
    }
}

pub fn staged_match(applicant_id: i64, position_id: i64, assigned: bool, hours: f64) -> Match {
    Match {
        assigned,
        hours_assigned: hours,
        ..Match::new(applicant_id, position_id)
    }
}

/// Application with `(position_id, position_code, level)` preferences
pub fn application(id: i64, applicant_id: i64, prefs: &[(i64, &str, i32)]) -> Application {
    Application {
        id,
        applicant_id,
        posting_id: Some(1),
        submission_date: Some("2024-08-01T10:00:00Z".to_string()),
        position_preferences: prefs
            .iter()
            .map(|(position_id, code, level)| PositionPreference {
                position_id: *position_id,
                position_code: code.to_string(),
                preference_level: *level,
            })
            .collect(),
        instructor_preferences: Vec::new(),
    }
}

/// Summary with nothing attached, as built for an applicant with no data
pub fn applicant_summary(applicant_id: i64) -> ApplicantSummary {
    ApplicantSummary {
        applicant: applicant(applicant_id),
        applicant_matching_datum: ApplicantMatchingDatum::empty(applicant_id, SESSION_ID),
        application: None,
        matches: Vec::new(),
        assignments: Vec::new(),
        total_hours_assigned: 0.0,
        filled_status: FillStatus::NotApplicable,
    }
}

pub fn with_preference(mut summary: ApplicantSummary, position: &Position, level: i32) -> ApplicantSummary {
    summary.application = Some(application(
        summary.applicant.id,
        summary.applicant.id,
        &[(position.id, position.position_code.as_str(), level)],
    ));
    summary
}

/// One session, applicant 1 applying to position 1 (CSC108H1F) at level 3
pub fn snapshot() -> MatchingSnapshot {
    MatchingSnapshot {
        active_session: Some(session()),
        applicants: vec![applicant(1), applicant(2)],
        positions: vec![
            position(1, "CSC108H1F", 5.0, 2),
            position(2, "CSC148H1S", 10.0, 1),
        ],
        applications: vec![application(1, 1, &[(1, "CSC108H1F", 3)])],
        ..Default::default()
    }
}

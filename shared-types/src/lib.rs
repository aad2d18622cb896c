use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod applicant;
pub mod application;
pub mod assignment;
pub mod matching;
pub mod position;
pub mod session;
pub mod summary;

pub use applicant::{Applicant, ApplicantsResponse};
pub use application::{
    Application, ApplicationsResponse, InstructorPreference, PositionPreference,
};
pub use assignment::{Assignment, AssignmentsResponse, CreateAssignmentRequest, OfferStatus};
pub use matching::{ApplicantMatchingDatum, FillStatus, Match, MatchStatus, MatchingError};
pub use position::{round_hours, Position, PositionsResponse};
pub use session::Session;
pub use summary::{
    ApplicantSummary, PositionFillStats, PositionSummariesResponse, PositionSummary,
};

/// Assignments created by finalizing staged matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinalizeResponse {
    pub created: Vec<Assignment>,
}

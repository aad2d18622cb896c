pub mod memory_store;

pub use memory_store::InMemoryStore;

use anyhow::Result;
use async_trait::async_trait;
use shared_types::{
    Applicant, ApplicantMatchingDatum, Application, Assignment, CreateAssignmentRequest, Match,
    Position, Session,
};

/// Data access for the matching view.
///
/// Fetches are scoped to the active session. Upserts match on composite keys:
/// `(applicant_id, position_id)` for matches and `(applicant_id, session_id)`
/// for matching data, never on the surrogate id.
#[async_trait]
pub trait MatchingStore: Send + Sync {
    async fn active_session(&self) -> Result<Option<Session>>;

    async fn fetch_applicants(&self) -> Result<Vec<Applicant>>;
    async fn fetch_positions(&self) -> Result<Vec<Position>>;
    async fn fetch_applications(&self) -> Result<Vec<Application>>;
    async fn fetch_assignments(&self) -> Result<Vec<Assignment>>;
    async fn fetch_applicant_matching_data(&self) -> Result<Vec<ApplicantMatchingDatum>>;
    async fn fetch_matches(&self) -> Result<Vec<Match>>;

    async fn upsert_match(&self, staged: Match) -> Result<Match>;
    async fn upsert_applicant_matching_datum(
        &self,
        datum: ApplicantMatchingDatum,
    ) -> Result<ApplicantMatchingDatum>;
    async fn upsert_assignment(&self, request: CreateAssignmentRequest) -> Result<Assignment>;
}

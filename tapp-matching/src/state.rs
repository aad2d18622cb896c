//! Loaded collections plus memoized summaries.
//!
//! Every collection carries a revision number that changes whenever it is
//! replaced or edited. Cached summaries are keyed on the revisions they were
//! built from, so a cache hit is always current; dropping the cache only
//! costs a rebuild.

use anyhow::Result;
use shared_types::{
    Applicant, ApplicantMatchingDatum, ApplicantSummary, Application, Assignment,
    CreateAssignmentRequest, Match, MatchingError, Position, PositionSummary, Session,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::consolidate::consolidate_by_applicant;
use crate::protocol;
use crate::snapshot::MatchingSnapshot;
use crate::store::MatchingStore;
use crate::summary::{build_applicant_summaries, build_position_summaries};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Revisions {
    session: u64,
    applicants: u64,
    positions: u64,
    applications: u64,
    assignments: u64,
    matching_data: u64,
    matches: u64,
}

struct Cached<K, V> {
    key: K,
    value: Arc<V>,
}

#[derive(Default)]
pub struct MatchingState {
    active_session: Option<Session>,
    applicants: Vec<Applicant>,
    positions: Vec<Position>,
    applications: Vec<Application>,
    assignments: Vec<Assignment>,
    matching_data: Vec<ApplicantMatchingDatum>,
    matches: Vec<Match>,

    revisions: Revisions,
    next_revision: u64,

    consolidated: Option<Cached<u64, HashMap<i64, Application>>>,
    applicant_summaries: Option<Cached<Revisions, Vec<ApplicantSummary>>>,
    position_summaries: Option<Cached<Revisions, BTreeMap<i64, PositionSummary>>>,
}

fn loaded<T>(collection: &'static str, result: Result<T>, failed: &mut Vec<&'static str>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", collection, e);
            failed.push(collection);
            None
        }
    }
}

impl MatchingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: MatchingSnapshot) -> Self {
        let mut state = Self::new();
        state.set_active_session(snapshot.active_session);
        state.set_applicants(snapshot.applicants);
        state.set_positions(snapshot.positions);
        state.set_applications(snapshot.applications);
        state.set_assignments(snapshot.assignments);
        state.set_matching_data(snapshot.applicant_matching_data);
        state.set_matches(snapshot.matches);
        state
    }

    fn bump(&mut self) -> u64 {
        self.next_revision += 1;
        self.next_revision
    }

    pub fn set_active_session(&mut self, session: Option<Session>) {
        self.active_session = session;
        self.revisions.session = self.bump();
    }

    pub fn set_applicants(&mut self, applicants: Vec<Applicant>) {
        self.applicants = applicants;
        self.revisions.applicants = self.bump();
    }

    pub fn set_positions(&mut self, positions: Vec<Position>) {
        self.positions = positions;
        self.revisions.positions = self.bump();
    }

    pub fn set_applications(&mut self, applications: Vec<Application>) {
        self.applications = applications;
        self.revisions.applications = self.bump();
    }

    pub fn set_assignments(&mut self, assignments: Vec<Assignment>) {
        self.assignments = assignments;
        self.revisions.assignments = self.bump();
    }

    pub fn set_matching_data(&mut self, matching_data: Vec<ApplicantMatchingDatum>) {
        self.matching_data = matching_data;
        self.revisions.matching_data = self.bump();
    }

    pub fn set_matches(&mut self, matches: Vec<Match>) {
        self.matches = matches;
        self.revisions.matches = self.bump();
    }

    /// Merge an upserted match back in, replacing the one with the same
    /// `(applicant_id, position_id)`.
    pub fn apply_match(&mut self, staged: Match) {
        match self
            .matches
            .iter_mut()
            .find(|m| m.applicant_id == staged.applicant_id && m.position_id == staged.position_id)
        {
            Some(existing) => *existing = staged,
            None => self.matches.push(staged),
        }
        self.revisions.matches = self.bump();
    }

    /// Merge an upserted datum back in, replacing the one with the same
    /// `(applicant_id, session_id)`.
    pub fn apply_matching_datum(&mut self, datum: ApplicantMatchingDatum) {
        match self
            .matching_data
            .iter_mut()
            .find(|d| d.applicant_id == datum.applicant_id && d.session_id == datum.session_id)
        {
            Some(existing) => *existing = datum,
            None => self.matching_data.push(datum),
        }
        self.revisions.matching_data = self.bump();
    }

    pub fn apply_assignment(&mut self, assignment: Assignment) {
        match self.assignments.iter_mut().find(|a| a.id == assignment.id) {
            Some(existing) => *existing = assignment,
            None => self.assignments.push(assignment),
        }
        self.revisions.assignments = self.bump();
    }

    /// Fetch every collection concurrently.
    ///
    /// A failed fetch keeps whatever was loaded before and is reported by
    /// name; summaries stay derivable from the rest.
    pub async fn refresh<S: MatchingStore + ?Sized>(&mut self, store: &S) -> Vec<&'static str> {
        let (session, applicants, positions, applications, assignments, matching_data, matches) = tokio::join!(
            store.active_session(),
            store.fetch_applicants(),
            store.fetch_positions(),
            store.fetch_applications(),
            store.fetch_assignments(),
            store.fetch_applicant_matching_data(),
            store.fetch_matches(),
        );

        let mut failed = Vec::new();
        if let Some(v) = loaded("active session", session, &mut failed) {
            self.set_active_session(v);
        }
        if let Some(v) = loaded("applicants", applicants, &mut failed) {
            self.set_applicants(v);
        }
        if let Some(v) = loaded("positions", positions, &mut failed) {
            self.set_positions(v);
        }
        if let Some(v) = loaded("applications", applications, &mut failed) {
            self.set_applications(v);
        }
        if let Some(v) = loaded("assignments", assignments, &mut failed) {
            self.set_assignments(v);
        }
        if let Some(v) = loaded("applicant matching data", matching_data, &mut failed) {
            self.set_matching_data(v);
        }
        if let Some(v) = loaded("matches", matches, &mut failed) {
            self.set_matches(v);
        }
        failed
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.active_session.as_ref()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn position(&self, position_id: i64) -> Result<&Position, MatchingError> {
        self.positions
            .iter()
            .find(|p| p.id == position_id)
            .ok_or(MatchingError::UnknownPosition(position_id))
    }

    pub fn consolidated_applications(&mut self) -> Arc<HashMap<i64, Application>> {
        let key = self.revisions.applications;
        if let Some(cached) = self.consolidated.as_ref().filter(|c| c.key == key) {
            return cached.value.clone();
        }

        let value = Arc::new(consolidate_by_applicant(&self.applications));
        self.consolidated = Some(Cached {
            key,
            value: value.clone(),
        });
        value
    }

    pub fn applicant_summaries(&mut self) -> Arc<Vec<ApplicantSummary>> {
        let key = self.revisions;
        if let Some(cached) = self.applicant_summaries.as_ref().filter(|c| c.key == key) {
            tracing::debug!("Applicant summaries cache hit");
            return cached.value.clone();
        }

        let consolidated = self.consolidated_applications();
        let value = Arc::new(build_applicant_summaries(
            &self.applicants,
            &self.assignments,
            &self.matching_data,
            &self.matches,
            &consolidated,
            self.active_session.as_ref().map(|s| s.id),
        ));
        tracing::debug!("Rebuilt {} applicant summaries", value.len());

        self.applicant_summaries = Some(Cached {
            key,
            value: value.clone(),
        });
        value
    }

    pub fn position_summaries(&mut self) -> Arc<BTreeMap<i64, PositionSummary>> {
        let key = self.revisions;
        if let Some(cached) = self.position_summaries.as_ref().filter(|c| c.key == key) {
            tracing::debug!("Position summaries cache hit");
            return cached.value.clone();
        }

        let applicant_summaries = self.applicant_summaries();
        let value = Arc::new(build_position_summaries(&self.positions, &applicant_summaries));
        tracing::debug!("Rebuilt {} position summaries", value.len());

        self.position_summaries = Some(Cached {
            key,
            value: value.clone(),
        });
        value
    }

    pub fn applicant_summary(&mut self, applicant_id: i64) -> Result<ApplicantSummary, MatchingError> {
        if self.active_session.is_none() {
            return Err(MatchingError::NoActiveSession);
        }
        self.applicant_summaries()
            .iter()
            .find(|s| s.applicant_id() == applicant_id)
            .cloned()
            .ok_or(MatchingError::UnknownApplicant(applicant_id))
    }

    /// Resolve a find-or-create target for a toggle.
    fn resolve(
        &mut self,
        applicant_id: i64,
        position_id: i64,
    ) -> Result<(ApplicantSummary, Position), MatchingError> {
        let invalid = MatchingError::InvalidReference {
            applicant_id,
            position_id,
        };
        let position = match self.position(position_id) {
            Ok(position) => position.clone(),
            Err(_) => return Err(invalid),
        };
        match self.applicant_summary(applicant_id) {
            Ok(summary) => Ok((summary, position)),
            Err(_) => Err(invalid),
        }
    }

    /// Toggle a staged assignment. Without explicit hours the position's
    /// hours per assignment are used.
    pub async fn toggle_assigned<S: MatchingStore + ?Sized>(
        &mut self,
        store: &S,
        applicant_id: i64,
        position_id: i64,
        hours: Option<f64>,
    ) -> Result<Match> {
        let (summary, position) = self.resolve(applicant_id, position_id)?;
        let hours = hours.unwrap_or(position.hours_per_assignment);
        let staged = protocol::toggle_assigned(store, &summary, &position, hours).await?;
        self.apply_match(staged.clone());
        Ok(staged)
    }

    pub async fn toggle_starred<S: MatchingStore + ?Sized>(
        &mut self,
        store: &S,
        applicant_id: i64,
        position_id: i64,
    ) -> Result<Match> {
        let (summary, position) = self.resolve(applicant_id, position_id)?;
        let staged = protocol::toggle_starred(store, &summary, &position).await?;
        self.apply_match(staged.clone());
        Ok(staged)
    }

    pub async fn toggle_hidden<S: MatchingStore + ?Sized>(
        &mut self,
        store: &S,
        applicant_id: i64,
        position_id: i64,
    ) -> Result<Match> {
        let (summary, position) = self.resolve(applicant_id, position_id)?;
        let staged = protocol::toggle_hidden(store, &summary, &position).await?;
        self.apply_match(staged.clone());
        Ok(staged)
    }

    pub async fn toggle_applicant_hidden<S: MatchingStore + ?Sized>(
        &mut self,
        store: &S,
        applicant_id: i64,
    ) -> Result<ApplicantMatchingDatum> {
        let summary = self.applicant_summary(applicant_id)?;
        let datum =
            protocol::toggle_applicant_hidden(store, &summary.applicant_matching_datum).await?;
        self.apply_matching_datum(datum.clone());
        Ok(datum)
    }

    /// The requests Finalize would issue from the loaded data, checked the
    /// same way Finalize checks them.
    pub fn planned_assignments(&self) -> Result<Vec<CreateAssignmentRequest>, MatchingError> {
        let requests = protocol::staged_assignment_requests(&self.matches, &self.assignments);
        protocol::check_references(&requests, &self.applicants, &self.positions)?;
        Ok(requests)
    }

    pub async fn finalize<S: MatchingStore + ?Sized>(&mut self, store: &S) -> Result<Vec<Assignment>> {
        let created = protocol::finalize(store).await?;
        for assignment in &created {
            self.apply_assignment(assignment.clone());
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{get_hours_assigned, get_match_status};
    use crate::store::InMemoryStore;
    use crate::test_support::{self, position, SESSION_ID};
    use async_trait::async_trait;
    use shared_types::{FillStatus, MatchStatus};

    #[test]
    fn test_summaries_cached_until_input_changes() {
        let mut state = MatchingState::from_snapshot(test_support::snapshot());

        let first = state.applicant_summaries();
        let second = state.applicant_summaries();
        assert!(Arc::ptr_eq(&first, &second));

        state.apply_match(test_support::staged_match(1, 1, true, 5.0));
        let third = state.applicant_summaries();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third[0].total_hours_assigned, 5.0);
    }

    #[test]
    fn test_position_summaries_follow_edits() {
        let mut state = MatchingState::from_snapshot(test_support::snapshot());
        assert_eq!(state.position_summaries()[&1].hours_assigned, 0.0);
        assert_eq!(state.position_summaries()[&1].filled_status, FillStatus::Empty);

        state.apply_match(test_support::staged_match(1, 1, true, 10.0));
        let summaries = state.position_summaries();
        assert_eq!(summaries[&1].hours_assigned, 10.0);
        assert_eq!(summaries[&1].filled_status, FillStatus::Matched);
    }

    #[test]
    fn test_unknown_targets_are_invalid_references() {
        let mut state = MatchingState::from_snapshot(test_support::snapshot());
        assert!(matches!(
            state.resolve(1, 99),
            Err(MatchingError::InvalidReference {
                applicant_id: 1,
                position_id: 99
            })
        ));
        assert!(matches!(
            state.resolve(42, 1),
            Err(MatchingError::InvalidReference { .. })
        ));
        assert!(matches!(
            state.applicant_summary(42),
            Err(MatchingError::UnknownApplicant(42))
        ));
    }

    #[tokio::test]
    async fn test_toggle_unknown_target_writes_nothing() {
        let store = InMemoryStore::new(test_support::snapshot());
        let mut state = MatchingState::from_snapshot(test_support::snapshot());

        let err = state.toggle_starred(&store, 1, 99).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MatchingError>(),
            Some(MatchingError::InvalidReference {
                applicant_id: 1,
                position_id: 99
            })
        ));
        assert!(state.toggle_assigned(&store, 42, 1, Some(5.0)).await.is_err());
        assert!(state.toggle_applicant_hidden(&store, 42).await.is_err());

        assert!(store.fetch_matches().await.unwrap().is_empty());
        assert!(store.snapshot().await.applicant_matching_data.is_empty());
        assert!(state.matches().is_empty());
    }

    #[test]
    fn test_planned_assignments_checked_like_finalize() {
        let mut snapshot = test_support::snapshot();
        snapshot.matches = vec![test_support::staged_match(1, 1, true, 5.0)];
        let mut state = MatchingState::from_snapshot(snapshot);

        let planned = state.planned_assignments().unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!((planned[0].applicant_id, planned[0].position_id), (1, 1));

        state.apply_match(test_support::staged_match(1, 99, true, 5.0));
        assert!(matches!(
            state.planned_assignments(),
            Err(MatchingError::InvalidReference {
                applicant_id: 1,
                position_id: 99
            })
        ));
    }

    #[test]
    fn test_no_active_session() {
        let mut snapshot = test_support::snapshot();
        snapshot.active_session = None;
        let mut state = MatchingState::from_snapshot(snapshot);

        assert!(state.applicant_summaries().is_empty());
        assert!(state.position_summaries()[&1].applicant_summaries.is_empty());
        assert!(matches!(
            state.applicant_summary(1),
            Err(MatchingError::NoActiveSession)
        ));
    }

    /// Store whose application and assignment fetches always fail
    struct FlakyStore(InMemoryStore);

    #[async_trait]
    impl MatchingStore for FlakyStore {
        async fn active_session(&self) -> Result<Option<Session>> {
            self.0.active_session().await
        }
        async fn fetch_applicants(&self) -> Result<Vec<Applicant>> {
            self.0.fetch_applicants().await
        }
        async fn fetch_positions(&self) -> Result<Vec<Position>> {
            self.0.fetch_positions().await
        }
        async fn fetch_applications(&self) -> Result<Vec<Application>> {
            Err(anyhow::anyhow!("connection reset"))
        }
        async fn fetch_assignments(&self) -> Result<Vec<Assignment>> {
            Err(anyhow::anyhow!("timed out"))
        }
        async fn fetch_applicant_matching_data(&self) -> Result<Vec<ApplicantMatchingDatum>> {
            self.0.fetch_applicant_matching_data().await
        }
        async fn fetch_matches(&self) -> Result<Vec<Match>> {
            self.0.fetch_matches().await
        }
        async fn upsert_match(&self, staged: Match) -> Result<Match> {
            self.0.upsert_match(staged).await
        }
        async fn upsert_applicant_matching_datum(
            &self,
            datum: ApplicantMatchingDatum,
        ) -> Result<ApplicantMatchingDatum> {
            self.0.upsert_applicant_matching_datum(datum).await
        }
        async fn upsert_assignment(&self, request: CreateAssignmentRequest) -> Result<Assignment> {
            self.0.upsert_assignment(request).await
        }
    }

    #[tokio::test]
    async fn test_refresh_tolerates_failed_fetches() {
        let store = FlakyStore(InMemoryStore::new(test_support::snapshot()));
        let mut state = MatchingState::new();

        let failed = state.refresh(&store).await;
        assert_eq!(failed, vec!["applications", "assignments"]);

        let summaries = state.applicant_summaries();
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].application.is_none());
        assert_eq!(state.active_session().map(|s| s.id), Some(SESSION_ID));
    }

    #[tokio::test]
    async fn test_end_to_end_applied_to_assigned() {
        let store = InMemoryStore::new(test_support::snapshot());
        let mut state = MatchingState::new();
        assert!(state.refresh(&store).await.is_empty());

        let p1 = position(1, "CSC108H1F", 5.0, 2);
        let summary = state.applicant_summary(1).unwrap();
        assert_eq!(get_match_status(&summary, &p1), MatchStatus::Applied);

        state.toggle_assigned(&store, 1, 1, Some(5.0)).await.unwrap();
        let summary = state.applicant_summary(1).unwrap();
        assert_eq!(get_match_status(&summary, &p1), MatchStatus::StagedAssigned);
        assert_eq!(get_hours_assigned(&summary, &p1), 5.0);

        let created = state.finalize(&store).await.unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(
            (created[0].position_id, created[0].applicant_id, created[0].hours),
            (1, 1, 5.0)
        );

        // Reflect the committed assignment back from the store.
        state.refresh(&store).await;
        let summary = state.applicant_summary(1).unwrap();
        assert_eq!(get_match_status(&summary, &p1), MatchStatus::Assigned);
        assert_eq!(get_hours_assigned(&summary, &p1), 5.0);
        assert_eq!(summary.total_hours_assigned, 5.0);
        assert_eq!(state.position_summaries()[&1].hours_assigned, 5.0);
    }

    #[tokio::test]
    async fn test_toggle_assigned_defaults_to_position_hours() {
        let store = InMemoryStore::new(test_support::snapshot());
        let mut state = MatchingState::from_snapshot(test_support::snapshot());

        let staged = state.toggle_assigned(&store, 2, 2, None).await.unwrap();
        assert_eq!(staged.hours_assigned, 10.0);
    }

    #[tokio::test]
    async fn test_toggle_applicant_hidden_round_trip() {
        let store = InMemoryStore::new(test_support::snapshot());
        let mut state = MatchingState::from_snapshot(test_support::snapshot());
        let p1 = position(1, "CSC108H1F", 5.0, 2);

        let datum = state.toggle_applicant_hidden(&store, 1).await.unwrap();
        assert!(datum.hidden);
        let summary = state.applicant_summary(1).unwrap();
        assert_eq!(get_match_status(&summary, &p1), MatchStatus::Hidden);

        let datum = state.toggle_applicant_hidden(&store, 1).await.unwrap();
        assert!(!datum.hidden);
        assert_eq!(store.snapshot().await.applicant_matching_data.len(), 1);
    }
}

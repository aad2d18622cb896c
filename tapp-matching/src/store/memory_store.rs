use super::MatchingStore;
use crate::index::{match_key, matching_datum_key};
use crate::snapshot::MatchingSnapshot;
use anyhow::Result;
use async_trait::async_trait;
use shared_types::{
    Applicant, ApplicantMatchingDatum, Application, Assignment, CreateAssignmentRequest, Match,
    Position, Session,
};
use tokio::sync::Mutex;

/// Store backed by an in-memory snapshot
pub struct InMemoryStore {
    data: Mutex<MatchingSnapshot>,
}

impl InMemoryStore {
    pub fn new(snapshot: MatchingSnapshot) -> Self {
        Self {
            data: Mutex::new(snapshot),
        }
    }

    /// Copy of the current contents, e.g. for writing back to disk
    pub async fn snapshot(&self) -> MatchingSnapshot {
        self.data.lock().await.clone()
    }

    fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
        ids.max().unwrap_or(0) + 1
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(MatchingSnapshot::default())
    }
}

#[async_trait]
impl MatchingStore for InMemoryStore {
    async fn active_session(&self) -> Result<Option<Session>> {
        Ok(self.data.lock().await.active_session.clone())
    }

    async fn fetch_applicants(&self) -> Result<Vec<Applicant>> {
        Ok(self.data.lock().await.applicants.clone())
    }

    async fn fetch_positions(&self) -> Result<Vec<Position>> {
        Ok(self.data.lock().await.positions.clone())
    }

    async fn fetch_applications(&self) -> Result<Vec<Application>> {
        Ok(self.data.lock().await.applications.clone())
    }

    async fn fetch_assignments(&self) -> Result<Vec<Assignment>> {
        Ok(self.data.lock().await.assignments.clone())
    }

    async fn fetch_applicant_matching_data(&self) -> Result<Vec<ApplicantMatchingDatum>> {
        let data = self.data.lock().await;
        let session_id = data.active_session.as_ref().map(|s| s.id);
        Ok(data
            .applicant_matching_data
            .iter()
            .filter(|datum| Some(datum.session_id) == session_id)
            .cloned()
            .collect())
    }

    async fn fetch_matches(&self) -> Result<Vec<Match>> {
        Ok(self.data.lock().await.matches.clone())
    }

    async fn upsert_match(&self, staged: Match) -> Result<Match> {
        let mut data = self.data.lock().await;

        let key = match_key(&staged);
        if let Some(existing) = data.matches.iter_mut().find(|m| match_key(m) == key) {
            let id = existing.id;
            *existing = Match { id, ..staged };
            return Ok(existing.clone());
        }

        let id = Self::next_id(data.matches.iter().filter_map(|m| m.id));
        let created = Match {
            id: Some(id),
            ..staged
        };
        data.matches.push(created.clone());
        Ok(created)
    }

    async fn upsert_applicant_matching_datum(
        &self,
        datum: ApplicantMatchingDatum,
    ) -> Result<ApplicantMatchingDatum> {
        let mut data = self.data.lock().await;

        let key = matching_datum_key(&datum);
        if let Some(existing) = data
            .applicant_matching_data
            .iter_mut()
            .find(|d| matching_datum_key(d) == key)
        {
            let id = existing.id;
            *existing = ApplicantMatchingDatum { id, ..datum };
            return Ok(existing.clone());
        }

        let id = Self::next_id(data.applicant_matching_data.iter().filter_map(|d| d.id));
        let created = ApplicantMatchingDatum {
            id: Some(id),
            ..datum
        };
        data.applicant_matching_data.push(created.clone());
        Ok(created)
    }

    async fn upsert_assignment(&self, request: CreateAssignmentRequest) -> Result<Assignment> {
        let mut data = self.data.lock().await;

        if let Some(existing) = data.assignments.iter_mut().find(|a| {
            a.applicant_id == request.applicant_id && a.position_id == request.position_id
        }) {
            existing.hours = request.hours;
            return Ok(existing.clone());
        }

        let created = Assignment {
            id: Self::next_id(data.assignments.iter().map(|a| a.id)),
            applicant_id: request.applicant_id,
            position_id: request.position_id,
            hours: request.hours,
            active_offer_status: None,
        };
        data.assignments.push(created.clone());
        Ok(created)
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared_types::{
    Applicant, ApplicantMatchingDatum, Application, Assignment, Match, Position, Session,
};
use std::path::Path;

/// Every collection the matching view works from, as exchanged with the
/// admin backend. Missing collections deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingSnapshot {
    #[serde(default)]
    pub active_session: Option<Session>,
    #[serde(default)]
    pub applicants: Vec<Applicant>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub applicant_matching_data: Vec<ApplicantMatchingDatum>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl MatchingSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot at {:?}", path))?;
        let snapshot: MatchingSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot at {:?}", path))?;

        tracing::debug!(
            applicants = snapshot.applicants.len(),
            positions = snapshot.positions.len(),
            matches = snapshot.matches.len(),
            "Loaded matching snapshot"
        );
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot to {:?}", path))?;
        Ok(())
    }
}

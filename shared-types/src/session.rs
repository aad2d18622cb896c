use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An academic session (term) that scopes postings and matching data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub id: i64,
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

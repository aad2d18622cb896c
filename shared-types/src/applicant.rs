use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Applicant {
    pub id: i64,
    pub utorid: String,
    pub first_name: String,
    pub last_name: String,
    pub student_number: Option<String>,
    pub email: Option<String>,
}

impl Applicant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ApplicantsResponse {
    pub applicants: Vec<Applicant>,
}

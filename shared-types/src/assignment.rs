use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Status of the offer attached to an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum OfferStatus {
    Provisional,
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl OfferStatus {
    /// Rejected and withdrawn offers no longer hold the applicant to the position.
    pub fn is_void(&self) -> bool {
        matches!(self, OfferStatus::Rejected | OfferStatus::Withdrawn)
    }
}

/// A committed assignment of an applicant to a position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assignment {
    pub id: i64,
    pub applicant_id: i64,
    pub position_id: i64,
    pub hours: f64,
    pub active_offer_status: Option<OfferStatus>,
}

impl Assignment {
    pub fn is_void(&self) -> bool {
        self.active_offer_status
            .map(|status| status.is_void())
            .unwrap_or(false)
    }

    /// Hours this assignment contributes; void assignments contribute none.
    pub fn effective_hours(&self) -> f64 {
        if self.is_void() {
            0.0
        } else {
            self.hours
        }
    }
}

/// Request to create an assignment from a staged match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateAssignmentRequest {
    pub applicant_id: i64,
    pub position_id: i64,
    pub hours: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct AssignmentsResponse {
    pub assignments: Vec<Assignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(status: Option<OfferStatus>) -> Assignment {
        Assignment {
            id: 1,
            applicant_id: 1,
            position_id: 1,
            hours: 12.5,
            active_offer_status: status,
        }
    }

    #[test]
    fn test_void_statuses() {
        assert!(assignment(Some(OfferStatus::Rejected)).is_void());
        assert!(assignment(Some(OfferStatus::Withdrawn)).is_void());
        assert!(!assignment(Some(OfferStatus::Pending)).is_void());
        assert!(!assignment(None).is_void());
    }

    #[test]
    fn test_effective_hours() {
        assert_eq!(assignment(Some(OfferStatus::Accepted)).effective_hours(), 12.5);
        assert_eq!(assignment(Some(OfferStatus::Withdrawn)).effective_hours(), 0.0);
    }

    #[test]
    fn test_offer_status_wire_names() {
        let json = serde_json::to_string(&OfferStatus::Withdrawn).unwrap();
        assert_eq!(json, "\"withdrawn\"");
        let parsed: OfferStatus = serde_json::from_str("\"provisional\"").unwrap();
        assert_eq!(parsed, OfferStatus::Provisional);
    }
}

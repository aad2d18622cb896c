use shared_types::{round_hours, FillStatus};

/// Fill status of an applicant against the hours they are owed.
///
/// Nothing owed is always `n/a`, whatever has been assigned.
pub fn applicant_fill_status(min_hours_owed: f64, assigned: f64) -> FillStatus {
    if round_hours(min_hours_owed) == 0.0 {
        return FillStatus::NotApplicable;
    }
    compare(min_hours_owed, assigned)
}

/// Fill status of a position against its target hours.
pub fn position_fill_status(target_hours: f64, assigned: f64) -> FillStatus {
    compare(target_hours, assigned)
}

fn compare(target: f64, assigned: f64) -> FillStatus {
    let target = round_hours(target);
    let assigned = round_hours(assigned);

    if assigned == 0.0 {
        FillStatus::Empty
    } else if assigned < target {
        FillStatus::Under
    } else if assigned == target {
        FillStatus::Matched
    } else {
        FillStatus::Over
    }
}

//! Merge an applicant's applications across postings into one.
//!
//! An applicant may apply through several postings. Within a posting only the
//! most recent submission counts; across postings the strongest preference per
//! position code wins while every instructor rating is kept.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate};
use shared_types::Application;

use crate::index::group_by;

/// Grouping key used for applications submitted outside any posting
const NO_POSTING: i64 = -1;

/// Consolidate one applicant's applications. `None` when there are none.
pub fn consolidate(applications: &[Application]) -> Option<Application> {
    consolidate_refs(applications.iter())
}

/// Consolidate a flat collection, keyed by applicant id.
pub fn consolidate_by_applicant(applications: &[Application]) -> HashMap<i64, Application> {
    group_by(applications, |app| app.applicant_id)
        .into_iter()
        .filter_map(|(applicant_id, apps)| {
            consolidate_refs(apps.into_iter()).map(|app| (applicant_id, app))
        })
        .collect()
}

fn consolidate_refs<'a>(applications: impl Iterator<Item = &'a Application>) -> Option<Application> {
    let mut by_posting: BTreeMap<i64, Vec<&Application>> = BTreeMap::new();
    for app in applications {
        by_posting
            .entry(app.posting_id.unwrap_or(NO_POSTING))
            .or_default()
            .push(app);
    }

    let mut representatives = by_posting.into_values().filter_map(|mut group| {
        // Stable, so equal dates keep input order and the later input wins.
        group.sort_by_key(|app| submission_key(app));
        group.pop()
    });

    let mut combined = representatives.next()?.clone();
    for app in representatives {
        merge_into(&mut combined, app);
    }
    Some(combined)
}

fn merge_into(combined: &mut Application, incoming: &Application) {
    for pref in &incoming.position_preferences {
        match combined
            .position_preferences
            .iter_mut()
            .find(|existing| existing.position_code == pref.position_code)
        {
            Some(existing) => {
                existing.preference_level = existing.preference_level.max(pref.preference_level);
            }
            None => combined.position_preferences.push(pref.clone()),
        }
    }

    combined
        .instructor_preferences
        .extend(incoming.instructor_preferences.iter().cloned());
}

/// Sort key for a submission date; missing or unparseable dates sort first.
fn submission_key(app: &Application) -> Option<i64> {
    let raw = app.submission_date.as_deref()?.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

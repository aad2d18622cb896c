//! Id-keyed lookups over flat collections.
//!
//! Duplicate ids resolve last-write-wins: a later element in the input
//! replaces an earlier one with the same key.

use std::collections::HashMap;
use std::hash::Hash;

use shared_types::{Applicant, ApplicantMatchingDatum, Application, Assignment, Match, Position};

/// Records that carry a stable surrogate id
pub trait HasId {
    fn id(&self) -> i64;
}

impl HasId for Applicant {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for Position {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for Application {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for Assignment {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Build an id map. Later duplicates replace earlier ones.
pub fn by_id<'a, T: HasId>(items: impl IntoIterator<Item = &'a T>) -> HashMap<i64, &'a T>
where
    T: 'a,
{
    by_key(items, |item| item.id())
}

/// Build a map on an arbitrary key. Later duplicates replace earlier ones.
pub fn by_key<'a, T, K, F>(items: impl IntoIterator<Item = &'a T>, key: F) -> HashMap<K, &'a T>
where
    T: 'a,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut map = HashMap::new();
    for item in items {
        map.insert(key(item), item);
    }
    map
}

/// Group items on a key, keeping input order within each group.
pub fn group_by<'a, T, K, F>(
    items: impl IntoIterator<Item = &'a T>,
    key: F,
) -> HashMap<K, Vec<&'a T>>
where
    T: 'a,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut map: HashMap<K, Vec<&'a T>> = HashMap::new();
    for item in items {
        map.entry(key(item)).or_default().push(item);
    }
    map
}

/// Composite key of a staged match
pub fn match_key(m: &Match) -> (i64, i64) {
    (m.applicant_id, m.position_id)
}

/// Composite key of an applicant matching datum
pub fn matching_datum_key(datum: &ApplicantMatchingDatum) -> (i64, i64) {
    (datum.applicant_id, datum.session_id)
}

//! TAPP Matching
//!
//! Reconciles applications, assignments, applicant matching data and staged
//! matches into the per-applicant and per-position views used when matching
//! TAs to positions, and turns staged decisions into assignments.
//!
//! # Architecture
//!
//! - **Types**: records and summaries live in the `shared-types` crate
//! - **Derivation**: `consolidate`, `summary`, `status` and `fill` are pure
//!   functions over already-fetched collections
//! - **Edits**: `protocol` stages star/hide/assign decisions and finalizes
//!   them through a [`MatchingStore`]
//! - **State**: [`MatchingState`] holds the loaded collections and memoizes
//!   summaries
//!
//! # Example
//!
//! ```rust,ignore
//! use tapp_matching::{InMemoryStore, MatchingSnapshot, MatchingState};
//!
//! let store = InMemoryStore::new(MatchingSnapshot::load(path)?);
//! let mut state = MatchingState::new();
//! state.refresh(&store).await;
//! state.toggle_assigned(&store, applicant_id, position_id, None).await?;
//! let created = state.finalize(&store).await?;
//! ```

pub mod config;
pub mod consolidate;
pub mod fill;
pub mod index;
pub mod protocol;
pub mod snapshot;
pub mod sort;
pub mod state;
pub mod status;
pub mod store;
pub mod summary;

#[cfg(test)]
mod test_support;

pub use config::MatchingConfig;
pub use consolidate::{consolidate, consolidate_by_applicant};
pub use protocol::{finalize, staged_assignment_requests, staged_assignments};
pub use snapshot::MatchingSnapshot;
pub use state::MatchingState;
pub use status::{get_hours_assigned, get_match_status};
pub use store::{InMemoryStore, MatchingStore};
pub use summary::{build_applicant_summaries, build_position_summaries};

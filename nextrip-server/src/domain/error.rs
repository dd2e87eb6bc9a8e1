//! Domain error types.
//!
//! These errors represent missing or invalid departure data in the domain
//! layer. They are distinct from API/IO errors.

use super::{MalformedTimestamp, StopId};

/// Domain-level errors for departure data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// No departure on the permitted routes is currently known at a stop.
    ///
    /// Expected and frequent; callers surface it as "no estimate".
    #[error("no departures on permitted routes at stop {stop}")]
    NoData { stop: StopId },

    /// An upstream timestamp did not have the expected literal format
    #[error(transparent)]
    MalformedTimestamp(#[from] MalformedTimestamp),
}

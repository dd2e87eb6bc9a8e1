//! The selected journey and its latest estimates.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::domain::EpochMillis;
use crate::itinerary::{BoardSnapshot, Journey, JourneyEstimate, UpdateSummary};

use super::RefreshError;

/// Shared handle to the session.
pub type SharedSession = Arc<RwLock<Session>>;

/// Outcome of the most recent refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    /// No cycle has completed since the journey was selected.
    Pending,
    /// The last cycle installed a complete snapshot.
    Fresh { at: EpochMillis },
    /// The last cycle failed; estimates are from an earlier snapshot.
    Stale { since: EpochMillis, reason: String },
}

impl RefreshStatus {
    /// Lowercase name used in responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshStatus::Pending => "pending",
            RefreshStatus::Fresh { .. } => "fresh",
            RefreshStatus::Stale { .. } => "stale",
        }
    }
}

/// The journey being tracked and the estimates shown for it.
///
/// Every selection bumps `generation`; a refresh that started under an
/// older generation must not touch the new journey.
#[derive(Debug)]
pub struct Session {
    generation: u64,
    journey_id: String,
    journey: Journey,
    estimate: JourneyEstimate,
    status: RefreshStatus,
}

impl Session {
    /// Start tracking `journey`.
    pub fn new(journey_id: impl Into<String>, journey: Journey) -> Self {
        let estimate = journey.estimate();
        Self {
            generation: 0,
            journey_id: journey_id.into(),
            journey,
            estimate,
            status: RefreshStatus::Pending,
        }
    }

    /// Wrap in a shared handle.
    pub fn shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    /// Replace the tracked journey.
    ///
    /// Estimates are reset; nothing from the previous journey carries over.
    pub fn select(&mut self, journey_id: impl Into<String>, journey: Journey) -> u64 {
        self.generation += 1;
        self.journey_id = journey_id.into();
        self.estimate = journey.estimate();
        self.journey = journey;
        self.status = RefreshStatus::Pending;

        info!(
            journey = %self.journey_id,
            generation = self.generation,
            stops = self.journey.unique_stops().len(),
            "selected journey"
        );

        self.generation
    }

    /// Selection counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Catalog id of the tracked journey.
    pub fn journey_id(&self) -> &str {
        &self.journey_id
    }

    /// The tracked journey.
    pub fn journey(&self) -> &Journey {
        &self.journey
    }

    /// Estimates from the last installed snapshot.
    pub fn estimate(&self) -> &JourneyEstimate {
        &self.estimate
    }

    /// Outcome of the last cycle.
    pub fn status(&self) -> &RefreshStatus {
        &self.status
    }

    /// Returns true if the estimates shown are not from the latest cycle.
    pub fn is_stale(&self) -> bool {
        matches!(self.status, RefreshStatus::Stale { .. }) || self.estimate.is_stale()
    }

    /// Install a snapshot fetched under `generation` and recompute estimates.
    ///
    /// # Errors
    ///
    /// Returns `RefreshError::Superseded` if another journey was selected
    /// since the fetch started.
    pub fn apply(
        &mut self,
        generation: u64,
        snapshot: &BoardSnapshot,
    ) -> Result<UpdateSummary, RefreshError> {
        if generation != self.generation {
            return Err(RefreshError::Superseded);
        }

        let summary = self.journey.update(snapshot);
        self.estimate = self.journey.estimate();
        self.status = RefreshStatus::Fresh {
            at: snapshot.fetched_at(),
        };
        Ok(summary)
    }

    /// Record a failed cycle, keeping the previous estimates.
    ///
    /// Returns false, and changes nothing, if `generation` is out of date.
    pub fn mark_stale(&mut self, generation: u64, reason: impl Into<String>, at: EpochMillis) -> bool {
        if generation != self.generation {
            return false;
        }

        let since = match &self.status {
            RefreshStatus::Stale { since, .. } => *since,
            _ => at,
        };
        self.status = RefreshStatus::Stale {
            since,
            reason: reason.into(),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Departure, DepartureBoard, RouteId, StopId};
    use crate::itinerary::builtin;

    fn journey(id: &str) -> Journey {
        builtin().unwrap().select(id).unwrap()
    }

    fn full_snapshot(journey: &Journey, at: i64) -> BoardSnapshot {
        journey.unique_stops().iter().fold(
            BoardSnapshot::new(EpochMillis::new(at)),
            |snap, stop| {
                snap.with_board(
                    stop.clone(),
                    DepartureBoard::new(vec![Departure::new(
                        RouteId::parse("2").unwrap(),
                        "Due",
                        EpochMillis::new(at),
                        true,
                    )]),
                )
            },
        )
    }

    #[test]
    fn new_session_is_pending() {
        let session = Session::new("home_to_work", journey("home_to_work"));

        assert_eq!(session.generation(), 0);
        assert_eq!(session.status(), &RefreshStatus::Pending);
        assert!(!session.is_stale());
        assert_eq!(session.estimate().updated_at, None);
    }

    #[test]
    fn apply_installs_and_marks_fresh() {
        let mut session = Session::new("home_to_work", journey("home_to_work"));
        let snapshot = full_snapshot(session.journey(), 1_000);

        let summary = session.apply(0, &snapshot).unwrap();

        assert_eq!(summary.installed, session.journey().unique_stops().len());
        assert_eq!(
            session.status(),
            &RefreshStatus::Fresh {
                at: EpochMillis::new(1_000)
            }
        );
        assert_eq!(session.estimate().updated_at, Some(EpochMillis::new(1_000)));
    }

    #[test]
    fn apply_from_old_generation_is_discarded() {
        let mut session = Session::new("home_to_work", journey("home_to_work"));
        let snapshot = full_snapshot(session.journey(), 1_000);
        session.select("work_to_home", journey("work_to_home"));

        assert_eq!(session.apply(0, &snapshot), Err(RefreshError::Superseded));
        assert_eq!(session.status(), &RefreshStatus::Pending);
        assert_eq!(session.journey_id(), "work_to_home");
    }

    #[test]
    fn select_resets_estimates() {
        let mut session = Session::new("home_to_work", journey("home_to_work"));
        let snapshot = full_snapshot(session.journey(), 1_000);
        session.apply(0, &snapshot).unwrap();

        let generation = session.select("work_to_home", journey("work_to_home"));

        assert_eq!(generation, 1);
        assert_eq!(session.estimate().updated_at, None);
        assert_eq!(session.estimate().label, session.journey().label());
    }

    #[test]
    fn mark_stale_keeps_estimates_and_first_failure_time() {
        let mut session = Session::new("home_to_work", journey("home_to_work"));
        let snapshot = full_snapshot(session.journey(), 1_000);
        session.apply(0, &snapshot).unwrap();
        let before = session.estimate().clone();

        assert!(session.mark_stale(0, "timed out", EpochMillis::new(2_000)));
        assert!(session.mark_stale(0, "HTTP 503", EpochMillis::new(3_000)));

        assert_eq!(session.estimate(), &before);
        assert!(session.is_stale());
        assert_eq!(
            session.status(),
            &RefreshStatus::Stale {
                since: EpochMillis::new(2_000),
                reason: "HTTP 503".into()
            }
        );
    }

    #[test]
    fn mark_stale_ignores_old_generation() {
        let mut session = Session::new("home_to_work", journey("home_to_work"));
        session.select("work_to_home", journey("work_to_home"));

        assert!(!session.mark_stale(0, "late failure", EpochMillis::new(1)));
        assert_eq!(session.status(), &RefreshStatus::Pending);
    }

    #[test]
    fn unique_stops_are_polled_once() {
        let session = Session::new("home_to_work", journey("home_to_work"));
        let stops: Vec<&StopId> = session.journey().unique_stops().iter().collect();
        let mut deduped = stops.clone();
        deduped.sort();
        deduped.dedup();

        assert_eq!(stops.len(), deduped.len());
    }
}

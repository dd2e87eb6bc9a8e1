//! Journeys: alternative trips toward one goal.

use tracing::debug;

use crate::domain::{EpochMillis, StopId};

use super::{BoardSnapshot, ItineraryError, StopRegistry, Trip, TripEstimate, UpdateSummary};

/// A rider's goal (e.g. "Home to Work") and the trips that fulfil it.
///
/// Topology is fixed at construction. Only the stops' boards change, once
/// per refresh, through [`Journey::update`].
#[derive(Debug, Clone)]
pub struct Journey {
    label: String,
    trips: Vec<Trip>,
    stops: StopRegistry,
    last_update: Option<EpochMillis>,
}

impl Journey {
    /// Build a journey and register every stop its legs reference.
    ///
    /// # Errors
    ///
    /// Returns `ItineraryError::NoTrips` if `trips` is empty.
    pub fn new(label: impl Into<String>, trips: Vec<Trip>) -> Result<Self, ItineraryError> {
        if trips.is_empty() {
            return Err(ItineraryError::NoTrips);
        }

        let mut stops = StopRegistry::new();
        for leg in trips.iter().flat_map(Trip::legs) {
            stops.register(leg.origin(), leg.routes());
            stops.register(leg.destination(), leg.routes());
        }

        Ok(Self {
            label: label.into(),
            trips,
            stops,
            last_update: None,
        })
    }

    /// Journey description.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Alternative trips, in configuration order.
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// The journey's stops and their current boards.
    pub fn stops(&self) -> &StopRegistry {
        &self.stops
    }

    /// Distinct stop identifiers that must be polled, in first-reference
    /// order.
    pub fn unique_stops(&self) -> &[StopId] {
        self.stops.unique_stops()
    }

    /// When a snapshot was last installed.
    pub fn last_update(&self) -> Option<EpochMillis> {
        self.last_update
    }

    /// Install fresh boards by stop identifier.
    ///
    /// Stops missing from `snapshot` keep their previous departures and are
    /// marked stale.
    pub fn update(&mut self, snapshot: &BoardSnapshot) -> UpdateSummary {
        let summary = self.stops.install(snapshot);
        self.last_update = Some(snapshot.fetched_at());

        debug!(
            journey = %self.label,
            installed = summary.installed,
            retained = summary.retained.len(),
            "installed board snapshot"
        );

        summary
    }

    /// Estimate every trip over the current boards.
    ///
    /// Pure with respect to the journey: calling it twice without an
    /// intervening update yields identical output.
    pub fn estimate(&self) -> JourneyEstimate {
        JourneyEstimate {
            label: self.label.clone(),
            trips: self
                .trips
                .iter()
                .map(|trip| trip.estimate(&self.stops))
                .collect(),
            updated_at: self.last_update,
        }
    }
}

/// Estimates for every trip of a journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyEstimate {
    /// Journey description.
    pub label: String,
    /// One estimate per trip, in configuration order.
    pub trips: Vec<TripEstimate>,
    /// Fetch time of the snapshot the estimates were computed from.
    pub updated_at: Option<EpochMillis>,
}

impl JourneyEstimate {
    /// Returns true if any trip used a stale board.
    pub fn is_stale(&self) -> bool {
        self.trips.iter().any(TripEstimate::is_stale)
    }
}

//! Legs and the per-leg departure estimator.
//!
//! A leg is one uninterrupted ride between two stops on any of a set of
//! routes. Live boards only tell us when vehicles leave each stop, not
//! which vehicle is which, so the arrival at the far end is estimated from
//! a fixed nominal duration:
//!
//! ```text
//! origin departure ──(+ nominal duration)──▶ arrival anchor
//!                                            │
//!           first destination departure after ◀┘
//! ```
//!
//! The destination search only filters by the leg's routes. On a leg with
//! several routes it may pick a vehicle on a different route than the one
//! boarded at the origin; that imprecision is accepted.

use chrono::Duration;

use crate::domain::{Departure, DomainError, EpochMillis, RouteSet, StopId};

use super::{ItineraryError, StopRegistry};

/// One ride segment between two stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    origin: StopId,
    destination: StopId,
    routes: RouteSet,
    nominal_duration: Duration,
    label: String,
}

impl Leg {
    /// Create a leg.
    ///
    /// # Errors
    ///
    /// Returns an error if `routes` is empty or `nominal_duration` is
    /// negative.
    pub fn new(
        origin: StopId,
        destination: StopId,
        routes: RouteSet,
        nominal_duration: Duration,
        label: impl Into<String>,
    ) -> Result<Self, ItineraryError> {
        if routes.is_empty() {
            return Err(ItineraryError::EmptyRoutes);
        }

        if nominal_duration < Duration::zero() {
            return Err(ItineraryError::NegativeDuration(
                nominal_duration.num_seconds(),
            ));
        }

        Ok(Self {
            origin,
            destination,
            routes,
            nominal_duration,
            label: label.into(),
        })
    }

    /// Stop where the leg is boarded.
    pub fn origin(&self) -> &StopId {
        &self.origin
    }

    /// Stop where the leg is left.
    pub fn destination(&self) -> &StopId {
        &self.destination
    }

    /// Routes the leg may be ridden on.
    pub fn routes(&self) -> &RouteSet {
        &self.routes
    }

    /// Hand-tuned lower bound on travel time from origin to destination.
    pub fn nominal_duration(&self) -> Duration {
        self.nominal_duration
    }

    /// Free-text description.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The earliest departure from the origin on this leg's routes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoData` if no such departure is known.
    pub fn next_departure<'a>(&self, stops: &'a StopRegistry) -> Result<&'a Departure, DomainError> {
        stops
            .board(&self.origin)
            .and_then(|board| board.next_on(&self.routes))
            .ok_or_else(|| DomainError::NoData {
                stop: self.origin.clone(),
            })
    }

    /// The first departure from the origin strictly after `after`.
    ///
    /// Absent if `after` is absent or if nothing later is known; never
    /// falls back to an earlier departure.
    pub fn next_departure_after<'a>(
        &self,
        stops: &'a StopRegistry,
        after: Option<EpochMillis>,
    ) -> Option<&'a Departure> {
        departure_after(stops, &self.origin, &self.routes, after)
    }

    /// When a vehicle leaving the origin at `departure` plausibly reaches
    /// the destination.
    pub fn arrival_after(&self, departure: &Departure) -> Option<EpochMillis> {
        departure.time.checked_add(self.nominal_duration)
    }

    /// Arrival anchor for the next vehicle leaving the origin.
    ///
    /// Absent if the origin has no known departure.
    pub fn arrival_time(&self, stops: &StopRegistry) -> Option<EpochMillis> {
        let departure = self.next_departure(stops).ok()?;
        self.arrival_after(departure)
    }

    /// The first destination departure after the arrival anchor.
    pub fn arrival_estimate<'a>(&self, stops: &'a StopRegistry) -> Option<&'a Departure> {
        departure_after(
            stops,
            &self.destination,
            &self.routes,
            self.arrival_time(stops),
        )
    }

    /// Build the estimate for this leg given its chosen origin departure.
    ///
    /// With no departure the whole estimate is absent.
    pub fn estimate_from(&self, stops: &StopRegistry, departure: Option<&Departure>) -> LegEstimate {
        let arrival = departure
            .and_then(|d| self.arrival_after(d))
            .and_then(|anchor| {
                departure_after(stops, &self.destination, &self.routes, Some(anchor))
            });

        LegEstimate {
            label: self.label.clone(),
            routes: self.routes.clone(),
            stop_id: self.origin.clone(),
            departure: departure.cloned(),
            arrival_stop_id: self.destination.clone(),
            arrival: arrival.cloned(),
            stale: stops.is_stale(&self.origin) || stops.is_stale(&self.destination),
        }
    }
}

fn departure_after<'a>(
    stops: &'a StopRegistry,
    stop: &StopId,
    routes: &RouteSet,
    after: Option<EpochMillis>,
) -> Option<&'a Departure> {
    let after = after?;
    stops.board(stop)?.next_on_after(routes, after)
}

/// Estimated times for one leg of a trip.
///
/// `departure` and `arrival` are each either a full departure record or
/// absent; absence means "no estimate", not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegEstimate {
    /// Leg description.
    pub label: String,
    /// Routes the leg may be ridden on.
    pub routes: RouteSet,
    /// Origin stop.
    pub stop_id: StopId,
    /// Next usable departure from the origin.
    pub departure: Option<Departure>,
    /// Destination stop.
    pub arrival_stop_id: StopId,
    /// First destination departure after the estimated arrival.
    pub arrival: Option<Departure>,
    /// True if either stop's board was not refreshed in the latest cycle.
    pub stale: bool,
}

impl LegEstimate {
    /// Returns true if an origin departure is known.
    pub fn has_departure(&self) -> bool {
        self.departure.is_some()
    }
}

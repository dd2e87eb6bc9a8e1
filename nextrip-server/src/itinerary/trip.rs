//! Trips: one or two chained legs.

use tracing::trace;

use super::{Leg, LegEstimate, StopRegistry};

/// One concrete way to complete a journey.
///
/// A trip with no second leg is a direct ride; with a second leg the rider
/// transfers at (or near) the first leg's destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    label: String,
    first_leg: Leg,
    second_leg: Option<Leg>,
}

impl Trip {
    /// A single-leg trip.
    pub fn direct(label: impl Into<String>, leg: Leg) -> Self {
        Self {
            label: label.into(),
            first_leg: leg,
            second_leg: None,
        }
    }

    /// A trip with a transfer.
    pub fn with_transfer(label: impl Into<String>, first_leg: Leg, second_leg: Leg) -> Self {
        Self {
            label: label.into(),
            first_leg,
            second_leg: Some(second_leg),
        }
    }

    /// Free-text description.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The leg boarded first.
    pub fn first_leg(&self) -> &Leg {
        &self.first_leg
    }

    /// The connecting leg, if the trip needs a transfer.
    pub fn second_leg(&self) -> Option<&Leg> {
        self.second_leg.as_ref()
    }

    /// Iterate the trip's legs in riding order.
    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        std::iter::once(&self.first_leg).chain(self.second_leg.as_ref())
    }

    /// Chain the legs' estimates over the current boards.
    ///
    /// The connecting departure is the first one strictly after the first
    /// leg's arrival anchor, not simply the next one on the board. If the
    /// first leg has no departure, the second leg has none either.
    pub fn estimate(&self, stops: &StopRegistry) -> TripEstimate {
        let first_departure = match self.first_leg.next_departure(stops) {
            Ok(departure) => Some(departure),
            Err(e) => {
                trace!(trip = %self.label, error = %e, "no first-leg estimate");
                None
            }
        };

        let first = self.first_leg.estimate_from(stops, first_departure);

        let second = self.second_leg.as_ref().map(|leg| {
            let anchor = first_departure.and_then(|d| self.first_leg.arrival_after(d));
            let departure = leg.next_departure_after(stops, anchor);
            leg.estimate_from(stops, departure)
        });

        TripEstimate {
            label: self.label.clone(),
            first,
            second,
        }
    }
}

/// Estimated times for one trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripEstimate {
    /// Trip description.
    pub label: String,
    /// Estimate for the first leg.
    pub first: LegEstimate,
    /// Estimate for the connecting leg, present iff the trip has one.
    pub second: Option<LegEstimate>,
}

impl TripEstimate {
    /// Returns true if any leg used a stale board.
    pub fn is_stale(&self) -> bool {
        self.first.stale || self.second.as_ref().is_some_and(|s| s.stale)
    }
}

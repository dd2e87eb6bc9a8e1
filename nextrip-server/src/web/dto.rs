//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Departure;
use crate::itinerary::{JourneyDef, LegEstimate, TripEstimate};
use crate::refresh::{RefreshStatus, Session};

/// Request to change the tracked journey.
#[derive(Debug, Deserialize)]
pub struct SelectJourneyRequest {
    /// Catalog id, e.g. "home_to_work"
    pub id: String,
}

/// A journey available for selection.
#[derive(Debug, Serialize)]
pub struct JourneySummary {
    /// Catalog id
    pub id: String,

    /// Display label
    pub label: String,

    /// Number of alternative trips
    pub trips: usize,
}

/// Response listing the catalog.
#[derive(Debug, Serialize)]
pub struct JourneyListResponse {
    /// Every configured journey, in catalog order
    pub journeys: Vec<JourneySummary>,

    /// Id of the journey currently tracked
    pub selected: String,
}

/// Estimate for one leg.
///
/// `departure_text` and `departure_time_ms` are null together when no
/// departure is known; likewise the arrival pair.
#[derive(Debug, Serialize)]
pub struct LegResult {
    /// Leg description
    pub label: String,

    /// Routes the leg may be ridden on
    pub routes: Vec<String>,

    /// Origin stop
    pub stop_id: String,

    /// Countdown text, e.g. "5 Min" or "10:42"
    pub departure_text: Option<String>,

    /// Departure time, epoch milliseconds
    pub departure_time_ms: Option<i64>,

    /// Route of the departing vehicle
    pub departure_route: Option<String>,

    /// Whether the departure time is GPS-confirmed
    pub departure_actual: Option<bool>,

    /// Destination stop
    pub arrival_stop_id: String,

    /// Countdown text of the first destination departure after arrival
    pub arrival_text: Option<String>,

    /// Time of that departure, epoch milliseconds
    pub arrival_time_ms: Option<i64>,

    /// Whether either stop's board missed the latest refresh
    pub stale: bool,
}

/// Estimate for one trip.
#[derive(Debug, Serialize)]
pub struct TripResult {
    /// Trip description
    pub label: String,

    /// First leg
    pub first: LegResult,

    /// Connecting leg, absent for direct trips
    pub second: Option<LegResult>,
}

/// The tracked journey and its latest estimates.
#[derive(Debug, Serialize)]
pub struct JourneyResponse {
    /// Catalog id
    pub id: String,

    /// Display label
    pub label: String,

    /// Selection counter; changes whenever a journey is selected
    pub generation: u64,

    /// "pending", "fresh" or "stale"
    pub status: &'static str,

    /// Fetch time of the snapshot the estimates use, epoch milliseconds
    pub updated_at_ms: Option<i64>,

    /// When refreshes started failing, epoch milliseconds
    pub stale_since_ms: Option<i64>,

    /// Why the last refresh failed
    pub error: Option<String>,

    /// Whether any estimate may be out of date
    pub stale: bool,

    /// Stops polled each refresh
    pub stops: Vec<String>,

    /// One entry per trip, in configuration order
    pub trips: Vec<TripResult>,
}

/// Response for health checks.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: &'static str,

    /// "live" or "mock"
    pub source: &'static str,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl JourneySummary {
    /// Create from a catalog definition.
    pub fn from_def(def: &JourneyDef) -> Self {
        Self {
            id: def.id.clone(),
            label: def.label.clone(),
            trips: def.trips.len(),
        }
    }
}

fn text_and_time(departure: Option<&Departure>) -> (Option<String>, Option<i64>) {
    match departure {
        Some(d) => (Some(d.text.clone()), Some(d.time.as_millis())),
        None => (None, None),
    }
}

impl LegResult {
    /// Create from a leg estimate.
    pub fn from_estimate(estimate: &LegEstimate) -> Self {
        let departure = estimate.departure.as_ref();
        let (departure_text, departure_time_ms) = text_and_time(departure);
        let (arrival_text, arrival_time_ms) = text_and_time(estimate.arrival.as_ref());

        Self {
            label: estimate.label.clone(),
            routes: estimate.routes.to_strings(),
            stop_id: estimate.stop_id.to_string(),
            departure_text,
            departure_time_ms,
            departure_route: departure.map(|d| d.route.to_string()),
            departure_actual: departure.map(|d| d.actual),
            arrival_stop_id: estimate.arrival_stop_id.to_string(),
            arrival_text,
            arrival_time_ms,
            stale: estimate.stale,
        }
    }
}

impl TripResult {
    /// Create from a trip estimate.
    pub fn from_estimate(estimate: &TripEstimate) -> Self {
        Self {
            label: estimate.label.clone(),
            first: LegResult::from_estimate(&estimate.first),
            second: estimate.second.as_ref().map(LegResult::from_estimate),
        }
    }
}

impl JourneyResponse {
    /// Create from the session's current state.
    pub fn from_session(session: &Session) -> Self {
        let estimate = session.estimate();
        let (stale_since_ms, error) = match session.status() {
            RefreshStatus::Stale { since, reason } => {
                (Some(since.as_millis()), Some(reason.clone()))
            }
            _ => (None, None),
        };

        Self {
            id: session.journey_id().to_string(),
            label: estimate.label.clone(),
            generation: session.generation(),
            status: session.status().as_str(),
            updated_at_ms: estimate.updated_at.map(|t| t.as_millis()),
            stale_since_ms,
            error,
            stale: session.is_stale(),
            stops: session
                .journey()
                .unique_stops()
                .iter()
                .map(ToString::to_string)
                .collect(),
            trips: estimate.trips.iter().map(TripResult::from_estimate).collect(),
        }
    }
}

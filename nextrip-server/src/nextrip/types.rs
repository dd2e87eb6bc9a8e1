//! NexTrip API response DTOs.
//!
//! These types map directly to the NexTrip JSON departure records. Only
//! `Route`, `DepartureText`, `DepartureTime` and `Actual` are required; the
//! remaining fields are optional because the API omits them for scheduled
//! (non-GPS) departures.

use serde::Deserialize;

/// One record in the response to `GET /NexTrip/{stop}?format=json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NexTripDeparture {
    /// True if the departure time is from GPS tracking.
    pub actual: bool,

    /// Vehicle block (run) number.
    pub block_number: Option<i64>,

    /// Countdown or clock text ("5 Min", "Due", "10:42").
    pub departure_text: String,

    /// Vendor timestamp, e.g. `/Date(1539990000000-0500)/`.
    pub departure_time: String,

    /// Headsign description.
    pub description: Option<String>,

    /// Platform or gate, when the stop has more than one.
    pub gate: Option<String>,

    /// Route identifier ("2", "Blue").
    pub route: String,

    /// Direction of travel ("NORTHBOUND", "WESTBOUND").
    pub route_direction: Option<String>,

    /// Terminal letter for branching routes.
    pub terminal: Option<String>,

    /// Vehicle heading in degrees.
    pub vehicle_heading: Option<i32>,

    /// Last known vehicle latitude.
    pub vehicle_latitude: Option<f64>,

    /// Last known vehicle longitude.
    pub vehicle_longitude: Option<f64>,
}

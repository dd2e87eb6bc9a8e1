//! NexTrip departure-board client.
//!
//! This module provides an HTTP client for the Metro Transit NexTrip API,
//! which returns the upcoming departures at a single stop.
//!
//! Key characteristics of NexTrip:
//! - One request per stop; the response covers every route serving it
//! - Departures arrive in ascending time order
//! - Times are vendor strings (`/Date(<epoch-ms>-<offset>)/`) alongside a
//!   human-readable countdown ("5 Min") or clock time ("10:42")

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{NexTripClient, NexTripConfig};
pub use convert::{ConversionError, convert_board, convert_departure};
pub use error::NexTripError;
pub use mock::MockNexTripClient;
pub use types::NexTripDeparture;

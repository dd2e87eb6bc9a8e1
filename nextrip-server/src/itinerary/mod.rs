//! Itinerary time-chaining.
//!
//! This module answers: "for each way of making this journey, when does the
//! next usable vehicle leave, and when does the connection leave?"
//!
//! Legs are estimated from live departure boards plus a nominal duration;
//! trips chain a first leg into an optional second leg; journeys group
//! alternative trips and own the stops that must be polled. Estimation is
//! synchronous and performs no I/O; fresh boards arrive as a
//! [`BoardSnapshot`] once per refresh.

mod catalog;
mod config;
mod error;
mod journey;
mod leg;
mod snapshot;
mod stop;
mod trip;


pub use catalog::builtin;
pub use config::{ConfigError, JourneyCatalog, JourneyDef, LegDef, LegPosition, TripDef};
pub use error::ItineraryError;
pub use journey::{Journey, JourneyEstimate};
pub use leg::{Leg, LegEstimate};
pub use snapshot::BoardSnapshot;
pub use stop::{Freshness, Stop, StopRegistry, UpdateSummary};
pub use trip::{Trip, TripEstimate};

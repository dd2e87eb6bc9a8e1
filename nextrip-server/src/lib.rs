//! Transit departure estimator server.
//!
//! Polls Metro Transit NexTrip departure boards for the stops of a
//! configured journey and answers: "when does my next bus leave, and
//! which connection will I make?"

pub mod cache;
pub mod domain;
pub mod itinerary;
pub mod nextrip;
pub mod refresh;
pub mod web;

//! Domain types for departure-board estimation.
//!
//! This module contains the value types that represent validated transit
//! data. All types enforce their invariants at construction time, so code
//! that receives these types can trust their validity.

mod departure;
mod error;
mod route;
mod stop_id;
mod time;

pub use departure::{Departure, DepartureBoard, FetchedBoard};
pub use error::DomainError;
pub use route::{InvalidRouteId, RouteId, RouteSet};
pub use stop_id::{InvalidStopId, StopId};
pub use time::{EpochMillis, MalformedTimestamp, parse_timestamp};

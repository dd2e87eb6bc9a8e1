//! Conversion from NexTrip DTOs to domain types.

use tracing::warn;

use crate::domain::{Departure, DepartureBoard, DomainError, RouteId, StopId, parse_timestamp};

use super::types::NexTripDeparture;

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// The timestamp string was not in the vendor format
    #[error(transparent)]
    Timestamp(#[from] DomainError),

    /// The route field was empty or invalid
    #[error("invalid route: {0:?}")]
    InvalidRoute(String),
}

/// Convert a single NexTrip record.
pub fn convert_departure(record: &NexTripDeparture) -> Result<Departure, ConversionError> {
    let route = RouteId::parse(&record.route)
        .map_err(|_| ConversionError::InvalidRoute(record.route.clone()))?;

    let time = parse_timestamp(&record.departure_time).map_err(DomainError::from)?;

    Ok(Departure::new(
        route,
        record.departure_text.clone(),
        time,
        record.actual,
    ))
}

/// Convert a stop's full response into a departure board.
///
/// Upstream order is preserved. Records that fail conversion are logged and
/// dropped rather than failing the whole board.
pub fn convert_board(stop: &StopId, records: &[NexTripDeparture]) -> DepartureBoard {
    records
        .iter()
        .filter_map(|record| match convert_departure(record) {
            Ok(departure) => Some(departure),
            Err(e) => {
                warn!(stop = %stop, route = %record.route, error = %e, "dropping departure");
                None
            }
        })
        .collect()
}

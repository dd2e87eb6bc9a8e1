//! Itinerary construction errors.

/// Errors from building legs, trips and journeys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItineraryError {
    /// A leg must be rideable on at least one route
    #[error("leg has no permitted routes")]
    EmptyRoutes,

    /// Nominal duration is a lower bound and cannot be negative
    #[error("nominal duration must be non-negative, got {0}s")]
    NegativeDuration(i64),

    /// Nominal duration does not fit a `chrono::Duration`
    #[error("nominal duration of {0}s is out of range")]
    DurationOutOfRange(i64),

    /// A journey needs at least one way to complete it
    #[error("journey must have at least one trip")]
    NoTrips,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ItineraryError::EmptyRoutes.to_string(),
            "leg has no permitted routes"
        );
        assert_eq!(
            ItineraryError::NegativeDuration(-5).to_string(),
            "nominal duration must be non-negative, got -5s"
        );
        assert_eq!(
            ItineraryError::DurationOutOfRange(i64::MAX).to_string(),
            format!("nominal duration of {}s is out of range", i64::MAX)
        );
        assert_eq!(
            ItineraryError::NoTrips.to_string(),
            "journey must have at least one trip"
        );
    }
}

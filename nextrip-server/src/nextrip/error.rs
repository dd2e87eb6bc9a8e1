//! NexTrip client error types.

use std::fmt;

/// Errors from fetching a stop's departure board.
#[derive(Debug)]
pub enum NexTripError {
    /// The request never produced a response (connect failure, timeout)
    Http(reqwest::Error),

    /// The board body was not a JSON array of departure records
    Json {
        stop: String,
        message: String,
        /// Leading part of the body, when it came over the wire
        body: Option<String>,
    },

    /// NexTrip answered with a non-success status
    Status {
        stop: String,
        status: u16,
        body: String,
    },

    /// NexTrip has no board for this stop id
    StopNotFound(String),

    /// NexTrip answered 429
    RateLimited,

    /// The client was shut down while a request waited for a slot
    Closed,

    /// Mock board files could not be loaded
    MockData(String),
}

impl fmt::Display for NexTripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NexTripError::Http(e) => write!(f, "NexTrip request failed: {e}"),
            NexTripError::Json {
                stop,
                message,
                body,
            } => {
                write!(f, "unreadable board for stop {stop}: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body starts: {body})")?;
                }
                Ok(())
            }
            NexTripError::Status { stop, status, body } => {
                write!(f, "NexTrip returned {status} for stop {stop}")?;
                if !body.is_empty() {
                    write!(f, ": {body}")?;
                }
                Ok(())
            }
            NexTripError::StopNotFound(stop) => write!(f, "no departure board for stop {stop}"),
            NexTripError::RateLimited => write!(f, "NexTrip is rate limiting requests"),
            NexTripError::Closed => write!(f, "NexTrip client is shut down"),
            NexTripError::MockData(message) => write!(f, "mock board data: {message}"),
        }
    }
}

impl std::error::Error for NexTripError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NexTripError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NexTripError {
    fn from(err: reqwest::Error) -> Self {
        NexTripError::Http(err)
    }
}

//! NexTrip HTTP client.
//!
//! Provides async methods for querying the NexTrip departure-board API.
//! Handles concurrency limits and conversion to domain types.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{DepartureBoard, StopId};

use super::convert::convert_board;
use super::error::NexTripError;
use super::types::NexTripDeparture;

/// Default base URL for the NexTrip API.
const DEFAULT_BASE_URL: &str = "https://svc.metrotransit.org/NexTrip";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the NexTrip client.
#[derive(Debug, Clone)]
pub struct NexTripConfig {
    /// Base URL for the API (defaults to production NexTrip)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NexTripConfig {
    /// Create a new config pointing at production NexTrip.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for NexTripConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// NexTrip API client.
///
/// Uses a semaphore to limit concurrent requests when a refresh fans out
/// across many stops.
#[derive(Debug, Clone)]
pub struct NexTripClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl NexTripClient {
    /// Create a new NexTrip client with the given configuration.
    pub fn new(config: NexTripConfig) -> Result<Self, NexTripError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// URL of the departure board for `stop`.
    fn board_url(&self, stop: &StopId) -> String {
        format!("{}/{}", self.base_url, stop.as_str())
    }

    /// Get the raw departure records for a stop.
    pub async fn get_departures_raw(
        &self,
        stop: &StopId,
    ) -> Result<Vec<NexTripDeparture>, NexTripError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| NexTripError::Closed)?;

        let response = self
            .http
            .get(self.board_url(stop))
            .query(&[("format", "json")])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NexTripError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(NexTripError::StopNotFound(stop.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NexTripError::Status {
                stop: stop.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| NexTripError::Json {
            stop: stop.to_string(),
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Get the departure board for a stop.
    ///
    /// Records with malformed timestamps are dropped; the rest keep
    /// upstream order.
    pub async fn get_departures(&self, stop: &StopId) -> Result<DepartureBoard, NexTripError> {
        let records = self.get_departures_raw(stop).await?;
        let board = convert_board(stop, &records);

        debug!(
            stop = %stop,
            received = records.len(),
            kept = board.len(),
            "fetched departure board"
        );

        Ok(board)
    }
}

//! Caching layer for NexTrip responses.
//!
//! Several trips of a journey often share a stop, and a manual refresh can
//! land just after a scheduled one. Boards are cached per stop for a short
//! TTL so those cases reuse the previous response instead of re-polling.
//! A cached board keeps the time of the request that produced it.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{FetchedBoard, StopId};
use crate::nextrip::{NexTripClient, NexTripError};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(20),
            max_capacity: 500,
        }
    }
}

/// NexTrip client with caching.
///
/// Wraps a `NexTripClient` and caches departure boards keyed by stop.
pub struct CachedNexTripClient {
    client: NexTripClient,
    boards: MokaCache<StopId, FetchedBoard>,
}

impl CachedNexTripClient {
    /// Create a new cached client.
    pub fn new(client: NexTripClient, config: &CacheConfig) -> Self {
        let boards = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { client, boards }
    }

    /// Get the departure board for a stop, using the cache if available.
    pub async fn get_departures(&self, stop: &StopId) -> Result<FetchedBoard, NexTripError> {
        if let Some(cached) = self.boards.get(stop).await {
            trace!(stop = %stop, fetched_at = %cached.fetched_at, "board cache hit");
            return Ok(cached);
        }

        let fetched = FetchedBoard::now(self.client.get_departures(stop).await?);

        // Boards share storage, so the clone is cheap.
        self.boards.insert(stop.clone(), fetched.clone()).await;

        Ok(fetched)
    }
}

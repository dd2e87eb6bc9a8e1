//! Sources of departure boards for the refresh cycle.

use std::future::Future;
use std::sync::Arc;

use crate::cache::CachedNexTripClient;
use crate::domain::{FetchedBoard, StopId};
use crate::nextrip::{MockNexTripClient, NexTripClient, NexTripError};

/// Trait for providing departure boards.
///
/// This abstraction allows the refresh cycle to be tested with mock data.
pub trait BoardProvider {
    /// Fetch the departure board for one stop.
    ///
    /// The board may come from a cache; its `fetched_at` is the time it
    /// was actually requested from upstream.
    fn fetch_board(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<FetchedBoard, NexTripError>> + Send;
}

impl BoardProvider for NexTripClient {
    async fn fetch_board(&self, stop: &StopId) -> Result<FetchedBoard, NexTripError> {
        self.get_departures(stop).await.map(FetchedBoard::now)
    }
}

impl BoardProvider for CachedNexTripClient {
    async fn fetch_board(&self, stop: &StopId) -> Result<FetchedBoard, NexTripError> {
        self.get_departures(stop).await
    }
}

impl BoardProvider for MockNexTripClient {
    async fn fetch_board(&self, stop: &StopId) -> Result<FetchedBoard, NexTripError> {
        self.get_departures(stop).await.map(FetchedBoard::now)
    }
}

impl<P: BoardProvider + Send + Sync> BoardProvider for Arc<P> {
    fn fetch_board(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<FetchedBoard, NexTripError>> + Send {
        (**self).fetch_board(stop)
    }
}

/// The board provider chosen at startup.
pub enum BoardSource {
    /// Live NexTrip API behind the board cache.
    Live(CachedNexTripClient),
    /// Boards loaded from JSON files on disk.
    Mock(MockNexTripClient),
}

impl BoardSource {
    /// Short name for logs and the health endpoint.
    pub fn kind(&self) -> &'static str {
        match self {
            BoardSource::Live(_) => "live",
            BoardSource::Mock(_) => "mock",
        }
    }
}

impl BoardProvider for BoardSource {
    async fn fetch_board(&self, stop: &StopId) -> Result<FetchedBoard, NexTripError> {
        match self {
            BoardSource::Live(client) => client.fetch_board(stop).await,
            BoardSource::Mock(client) => client.fetch_board(stop).await,
        }
    }
}

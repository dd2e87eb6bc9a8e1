//! The periodic refresh cycle.
//!
//! One cycle reads the selected journey's stops, fetches every board
//! concurrently with no session lock held, and installs the complete
//! snapshot. A batch is all-or-nothing: if any stop fails, or the batch
//! runs past its timeout, nothing is installed and the session is marked
//! stale.

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::{EpochMillis, StopId};
use crate::itinerary::{BoardSnapshot, UpdateSummary};

use super::{BoardProvider, SharedSession};

/// Cycles restarted because the journey changed mid-fetch.
const MAX_ATTEMPTS: usize = 3;

/// Configuration for the refresh cycle.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between cycles.
    pub interval: Duration,
    /// Hard limit on one cycle's fetches.
    pub timeout: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(40),
            timeout: Duration::from_secs(15),
        }
    }
}

impl RefreshConfig {
    /// Set the time between cycles.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the per-cycle timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Error from a refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    /// A stop's board could not be fetched
    #[error("failed to fetch departures for stop {stop}: {message}")]
    Fetch { stop: StopId, message: String },

    /// The batch did not complete in time
    #[error("refresh timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Another cycle is in flight
    #[error("a refresh is already running")]
    Busy,

    /// The journey was changed while fetching
    #[error("journey selection changed during refresh")]
    Superseded,
}

/// Result of a completed cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Selection generation the snapshot was installed under.
    pub generation: u64,
    /// When the snapshot was taken.
    pub fetched_at: EpochMillis,
    /// What the install changed.
    pub summary: UpdateSummary,
}

/// Fetch the boards for `stops` concurrently.
///
/// The snapshot is dated by its oldest board, so boards served from the
/// cache never make the estimates look newer than the data behind them.
/// A snapshot with no stops is dated now.
///
/// # Errors
///
/// Fails on the first stop that cannot be fetched, or if the whole batch
/// takes longer than `timeout`.
pub async fn fetch_snapshot<P: BoardProvider>(
    provider: &P,
    stops: &[StopId],
    timeout: Duration,
) -> Result<BoardSnapshot, RefreshError> {
    let fetches = stops.iter().map(|stop| async move {
        provider
            .fetch_board(stop)
            .await
            .map(|fetched| (stop.clone(), fetched))
            .map_err(|e| RefreshError::Fetch {
                stop: stop.clone(),
                message: e.to_string(),
            })
    });

    let fetched = tokio::time::timeout(timeout, try_join_all(fetches))
        .await
        .map_err(|_| RefreshError::Timeout(timeout))??;

    let fetched_at = fetched
        .iter()
        .map(|(_, f)| f.fetched_at)
        .min()
        .unwrap_or_else(EpochMillis::now);

    Ok(BoardSnapshot::from_pairs(
        fetched_at,
        fetched.into_iter().map(|(stop, f)| (stop, f.board)),
    ))
}

/// Runs refresh cycles against the shared session.
///
/// At most one cycle runs at a time; a trigger that arrives while one is
/// in flight is skipped rather than queued.
pub struct Refresher<P> {
    provider: Arc<P>,
    session: SharedSession,
    config: RefreshConfig,
    running: Mutex<()>,
}

impl<P: BoardProvider + Send + Sync> Refresher<P> {
    /// Create a refresher.
    pub fn new(provider: Arc<P>, session: SharedSession, config: RefreshConfig) -> Self {
        Self {
            provider,
            session,
            config,
            running: Mutex::new(()),
        }
    }

    /// The session this refresher updates.
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// The board provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Cycle configuration.
    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Run one cycle now.
    ///
    /// If the journey is changed while boards are being fetched, the
    /// result is discarded and the cycle restarts for the new journey.
    ///
    /// # Errors
    ///
    /// Returns `RefreshError::Busy` if a cycle is already running, or the
    /// fetch error that marked the session stale.
    pub async fn run_cycle(&self) -> Result<CycleReport, RefreshError> {
        let _guard = self.running.try_lock().map_err(|_| RefreshError::Busy)?;

        let mut attempt = 1;
        loop {
            match self.attempt().await {
                Err(RefreshError::Superseded) if attempt < MAX_ATTEMPTS => {
                    debug!(attempt, "journey changed during refresh, restarting");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn attempt(&self) -> Result<CycleReport, RefreshError> {
        let (generation, stops) = {
            let session = self.session.read().await;
            (
                session.generation(),
                session.journey().unique_stops().to_vec(),
            )
        };

        match fetch_snapshot(self.provider.as_ref(), &stops, self.config.timeout).await {
            Ok(snapshot) => {
                let mut session = self.session.write().await;
                let summary = session.apply(generation, &snapshot)?;

                debug!(
                    generation,
                    stops = stops.len(),
                    installed = summary.installed,
                    "refreshed boards"
                );

                Ok(CycleReport {
                    generation,
                    fetched_at: snapshot.fetched_at(),
                    summary,
                })
            }
            Err(e) => {
                let mut session = self.session.write().await;
                if !session.mark_stale(generation, e.to_string(), EpochMillis::now()) {
                    return Err(RefreshError::Superseded);
                }

                warn!(generation, error = %e, "refresh failed, keeping previous estimates");
                Err(e)
            }
        }
    }

    /// Run cycles forever at the configured interval.
    ///
    /// The first cycle runs immediately. Ticks missed while a slow cycle
    /// was running are skipped, not replayed.
    pub async fn run_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_secs = self.config.interval.as_secs(),
            timeout_secs = self.config.timeout.as_secs(),
            "starting refresh loop"
        );

        loop {
            interval.tick().await;
            // Failures are logged where the session is marked stale.
            if let Err(RefreshError::Busy) = self.run_cycle().await {
                debug!("refresh already running, skipping tick");
            }
        }
    }
}

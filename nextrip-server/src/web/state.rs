//! Application state for the web layer.

use std::sync::Arc;

use crate::itinerary::JourneyCatalog;
use crate::refresh::{BoardSource, Refresher, SharedSession};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Journeys available for selection
    pub catalog: Arc<JourneyCatalog>,

    /// Refresh cycle runner; owns the session
    pub refresher: Arc<Refresher<BoardSource>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(catalog: JourneyCatalog, refresher: Refresher<BoardSource>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            refresher: Arc::new(refresher),
        }
    }

    /// The tracked journey and its estimates.
    pub fn session(&self) -> &SharedSession {
        self.refresher.session()
    }
}

//! Mock NexTrip client for testing without API access.
//!
//! Loads sample departure boards from JSON files and serves them
//! as if they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{DepartureBoard, StopId};

use super::convert::convert_board;
use super::error::NexTripError;
use super::types::NexTripDeparture;

/// Mock NexTrip client that serves data from JSON files.
#[derive(Clone)]
pub struct MockNexTripClient {
    /// Pre-loaded raw records, keyed by stop.
    boards: Arc<HashMap<StopId, Vec<NexTripDeparture>>>,
}

impl MockNexTripClient {
    /// Create a new mock client by loading JSON files from a directory.
    ///
    /// Expects files named `{stop}.json` (e.g. `16320.json`), each holding
    /// the JSON array the API would return for that stop.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, NexTripError> {
        let boards = load_dir(data_dir.as_ref())?;

        Ok(Self {
            boards: Arc::new(boards),
        })
    }

    /// Get the departure board for a stop.
    ///
    /// Mimics `NexTripClient::get_departures`.
    pub async fn get_departures(&self, stop: &StopId) -> Result<DepartureBoard, NexTripError> {
        let records = self
            .boards
            .get(stop)
            .ok_or_else(|| NexTripError::StopNotFound(stop.to_string()))?;

        Ok(convert_board(stop, records))
    }

    /// List available stops in the mock data.
    pub async fn available_stops(&self) -> Vec<StopId> {
        let mut stops: Vec<StopId> = self.boards.keys().cloned().collect();
        stops.sort();
        stops
    }
}

fn load_dir(data_dir: &Path) -> Result<HashMap<StopId, Vec<NexTripDeparture>>, NexTripError> {
    let mut boards = HashMap::new();

    let entries = std::fs::read_dir(data_dir)
        .map_err(|e| NexTripError::MockData(format!("cannot read {}: {e}", data_dir.display())))?;

    for entry in entries {
        let path = entry
            .map_err(|e| NexTripError::MockData(format!("cannot list {}: {e}", data_dir.display())))?
            .path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        // "16320.json" -> "16320"
        let stop = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| StopId::parse(stem).ok())
            .ok_or_else(|| {
                NexTripError::MockData(format!("{} is not named after a stop id", path.display()))
            })?;

        let json = std::fs::read_to_string(&path)
            .map_err(|e| NexTripError::MockData(format!("cannot read {}: {e}", path.display())))?;

        let records: Vec<NexTripDeparture> =
            serde_json::from_str(&json).map_err(|e| NexTripError::Json {
                stop: stop.to_string(),
                message: e.to_string(),
                body: None,
            })?;

        boards.insert(stop, records);
    }

    if boards.is_empty() {
        return Err(NexTripError::MockData(format!(
            "no board files in {}",
            data_dir.display()
        )));
    }

    Ok(boards)
}

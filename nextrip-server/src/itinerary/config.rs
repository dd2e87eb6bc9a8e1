//! Journey definitions loaded from static configuration.
//!
//! Definitions are plain serde structs. They are validated when a catalog
//! is loaded, so selecting a journey later cannot fail on bad data.
//!
//! ```json
//! {
//!   "journeys": [{
//!     "id": "home_to_work",
//!     "label": "Home to Work",
//!     "trips": [{
//!       "label": "2 then Blue Line",
//!       "first_leg":  { "routes": ["2", "67"], "origin": "56703", "destination": "51533", "nominal_duration_secs": 240 },
//!       "second_leg": { "routes": ["Blue"],    "origin": "51427", "destination": "51424", "nominal_duration_secs": 360 }
//!     }]
//!   }]
//! }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::{RouteSet, StopId};

use super::{ItineraryError, Journey, Leg, Trip};

/// Which leg of a trip a definition describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegPosition {
    First,
    Second,
}

impl fmt::Display for LegPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegPosition::First => f.write_str("first"),
            LegPosition::Second => f.write_str("second"),
        }
    }
}

/// Errors loading or validating journey configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The configuration was not valid JSON for the expected shape
    #[error("invalid journey config: {0}")]
    Json(String),

    /// A leg failed validation
    #[error("journey {journey:?}, trip {trip}, {position} leg: {source}")]
    InvalidLeg {
        journey: String,
        trip: usize,
        position: LegPosition,
        source: ItineraryError,
    },

    /// A journey failed validation
    #[error("journey {journey:?}: {source}")]
    InvalidJourney {
        journey: String,
        source: ItineraryError,
    },

    /// Journey ids must be non-empty
    #[error("journey id must not be empty")]
    EmptyId,

    /// Two journeys share an id
    #[error("duplicate journey id {0:?}")]
    DuplicateJourney(String),

    /// The catalog defines nothing
    #[error("no journeys defined")]
    Empty,

    /// No journey with this id
    #[error("unknown journey {0:?}")]
    UnknownJourney(String),
}

/// Definition of one leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegDef {
    /// Permitted routes; must be non-empty.
    pub routes: RouteSet,
    /// Boarding stop.
    pub origin: StopId,
    /// Alighting stop.
    pub destination: StopId,
    /// Lower-bound travel time in seconds; must be non-negative.
    pub nominal_duration_secs: i64,
    #[serde(default)]
    pub label: String,
}

impl LegDef {
    fn build(&self) -> Result<Leg, ItineraryError> {
        let secs = self.nominal_duration_secs;
        let nominal =
            Duration::try_seconds(secs).ok_or(ItineraryError::DurationOutOfRange(secs))?;

        Leg::new(
            self.origin.clone(),
            self.destination.clone(),
            self.routes.clone(),
            nominal,
            self.label.clone(),
        )
    }
}

/// Definition of one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDef {
    #[serde(default)]
    pub label: String,
    pub first_leg: LegDef,
    /// Absent or `null` for a direct trip.
    #[serde(default)]
    pub second_leg: Option<LegDef>,
}

/// Definition of one journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyDef {
    /// Stable identifier used to select the journey.
    pub id: String,
    /// Display label.
    pub label: String,
    pub trips: Vec<TripDef>,
}

impl JourneyDef {
    /// Build a fresh journey from this definition.
    pub fn build(&self) -> Result<Journey, ConfigError> {
        let leg_error = |trip: usize, position: LegPosition| {
            let journey = self.id.clone();
            move |source| ConfigError::InvalidLeg {
                journey,
                trip,
                position,
                source,
            }
        };

        let trips = self
            .trips
            .iter()
            .enumerate()
            .map(|(i, def)| {
                let first = def
                    .first_leg
                    .build()
                    .map_err(leg_error(i, LegPosition::First))?;

                Ok(match &def.second_leg {
                    Some(second) => {
                        let second = second
                            .build()
                            .map_err(leg_error(i, LegPosition::Second))?;
                        Trip::with_transfer(def.label.clone(), first, second)
                    }
                    None => Trip::direct(def.label.clone(), first),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Journey::new(self.label.clone(), trips).map_err(|source| ConfigError::InvalidJourney {
            journey: self.id.clone(),
            source,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    journeys: Vec<JourneyDef>,
}

/// The validated set of selectable journeys.
#[derive(Debug, Clone)]
pub struct JourneyCatalog {
    journeys: Vec<JourneyDef>,
}

impl JourneyCatalog {
    /// Validate definitions and build a catalog.
    ///
    /// Every definition is built once so that selection cannot fail later.
    pub fn new(journeys: Vec<JourneyDef>) -> Result<Self, ConfigError> {
        if journeys.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut seen = HashSet::new();
        for def in &journeys {
            if def.id.trim().is_empty() {
                return Err(ConfigError::EmptyId);
            }
            if !seen.insert(def.id.as_str()) {
                return Err(ConfigError::DuplicateJourney(def.id.clone()));
            }
            def.build()?;
        }

        Ok(Self { journeys })
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        Self::new(file.journeys)
    }

    /// Load and validate a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Definitions in catalog order.
    pub fn journeys(&self) -> &[JourneyDef] {
        &self.journeys
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &str) -> Option<&JourneyDef> {
        self.journeys.iter().find(|j| j.id == id)
    }

    /// Build a fresh journey for `id`.
    pub fn select(&self, id: &str) -> Result<Journey, ConfigError> {
        self.get(id)
            .ok_or_else(|| ConfigError::UnknownJourney(id.to_string()))?
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "journeys": [
            {
                "id": "home_to_work",
                "label": "Home to Work",
                "trips": [
                    {
                        "first_leg": {"routes": ["7"], "origin": "16320", "destination": "19294", "nominal_duration_secs": 600}
                    },
                    {
                        "label": "2 then Blue",
                        "first_leg": {"routes": ["2", "67"], "origin": "56703", "destination": "51533", "nominal_duration_secs": 240},
                        "second_leg": {"routes": ["Blue"], "origin": "51427", "destination": "51424", "nominal_duration_secs": 360, "label": "Blue Line"}
                    }
                ]
            },
            {
                "id": "errand",
                "label": "Errand",
                "trips": [
                    {
                        "first_leg": {"routes": ["2"], "origin": "13261", "destination": "13221", "nominal_duration_secs": 0},
                        "second_leg": null
                    }
                ]
            }
        ]
    }"#;

    fn leg_json(routes: &str, secs: i64) -> String {
        format!(
            r#"{{"journeys": [{{"id": "j", "label": "J", "trips": [{{"first_leg": {{"routes": {routes}, "origin": "1", "destination": "2", "nominal_duration_secs": {secs}}}}}]}}]}}"#
        )
    }

    #[test]
    fn parse_valid_catalog() {
        let catalog = JourneyCatalog::from_json(VALID).unwrap();

        assert_eq!(catalog.journeys().len(), 2);
        let def = catalog.get("home_to_work").unwrap();
        assert_eq!(def.trips.len(), 2);
        assert!(def.trips[0].second_leg.is_none());
        assert_eq!(
            def.trips[1].second_leg.as_ref().unwrap().label,
            "Blue Line"
        );
    }

    #[test]
    fn select_builds_journey() {
        let catalog = JourneyCatalog::from_json(VALID).unwrap();
        let journey = catalog.select("home_to_work").unwrap();

        assert_eq!(journey.label(), "Home to Work");
        assert_eq!(journey.trips().len(), 2);
        assert!(journey.trips()[1].second_leg().is_some());
        assert_eq!(journey.unique_stops().len(), 6);
    }

    #[test]
    fn select_unknown() {
        let catalog = JourneyCatalog::from_json(VALID).unwrap();
        assert_eq!(
            catalog.select("nowhere").unwrap_err(),
            ConfigError::UnknownJourney("nowhere".into())
        );
    }

    #[test]
    fn reject_empty_routes() {
        let err = JourneyCatalog::from_json(&leg_json("[]", 60)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidLeg {
                journey: "j".into(),
                trip: 0,
                position: LegPosition::First,
                source: ItineraryError::EmptyRoutes,
            }
        );
        assert_eq!(
            err.to_string(),
            "journey \"j\", trip 0, first leg: leg has no permitted routes"
        );
    }

    #[test]
    fn reject_negative_duration() {
        let err = JourneyCatalog::from_json(&leg_json(r#"["2"]"#, -30)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidLeg {
                source: ItineraryError::NegativeDuration(-30),
                ..
            }
        ));
    }

    #[test]
    fn reject_duration_out_of_range() {
        for secs in [i64::MAX, i64::MIN] {
            let err = JourneyCatalog::from_json(&leg_json(r#"["2"]"#, secs)).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidLeg {
                    journey: "j".into(),
                    trip: 0,
                    position: LegPosition::First,
                    source: ItineraryError::DurationOutOfRange(secs),
                }
            );
        }
    }

    #[test]
    fn reject_invalid_second_leg() {
        let json = r#"{"journeys": [{"id": "j", "label": "J", "trips": [{
            "first_leg": {"routes": ["2"], "origin": "1", "destination": "2", "nominal_duration_secs": 60},
            "second_leg": {"routes": [], "origin": "3", "destination": "4", "nominal_duration_secs": 60}
        }]}]}"#;

        let err = JourneyCatalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidLeg {
                position: LegPosition::Second,
                ..
            }
        ));
    }

    #[test]
    fn reject_bad_stop_id() {
        let json = leg_json(r#"["2"]"#, 60).replace(r#""origin": "1""#, r#""origin": "1/2""#);
        assert!(matches!(
            JourneyCatalog::from_json(&json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn reject_journey_without_trips() {
        let json = r#"{"journeys": [{"id": "j", "label": "J", "trips": []}]}"#;
        assert_eq!(
            JourneyCatalog::from_json(json).unwrap_err(),
            ConfigError::InvalidJourney {
                journey: "j".into(),
                source: ItineraryError::NoTrips,
            }
        );
    }

    #[test]
    fn reject_duplicate_ids() {
        let def = JourneyCatalog::from_json(&leg_json(r#"["2"]"#, 60))
            .unwrap()
            .journeys()[0]
            .clone();

        assert_eq!(
            JourneyCatalog::new(vec![def.clone(), def]).unwrap_err(),
            ConfigError::DuplicateJourney("j".into())
        );
    }

    #[test]
    fn reject_empty_catalog_and_blank_id() {
        assert_eq!(JourneyCatalog::new(vec![]).unwrap_err(), ConfigError::Empty);

        let json = leg_json(r#"["2"]"#, 60).replace(r#""id": "j""#, r#""id": " ""#);
        assert_eq!(JourneyCatalog::from_json(&json).unwrap_err(), ConfigError::EmptyId);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journeys.json");
        std::fs::write(&path, VALID).unwrap();

        let catalog = JourneyCatalog::load(&path).unwrap();
        assert!(catalog.get("errand").is_some());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JourneyCatalog::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

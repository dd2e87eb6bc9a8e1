//! Route identifiers and permitted-route sets.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid route identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route id: {reason}")]
pub struct InvalidRouteId {
    reason: &'static str,
}

/// A route identifier as published on departure boards (e.g. `"2"`, `"Blue"`).
///
/// Surrounding whitespace is trimmed. Route IDs are compared exactly, so
/// `"Blue"` and `"BLUE"` are different routes.
///
/// # Examples
///
/// ```
/// use nextrip_server::domain::RouteId;
///
/// let blue = RouteId::parse(" Blue ").unwrap();
/// assert_eq!(blue.as_str(), "Blue");
///
/// assert!(RouteId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteId(String);

impl RouteId {
    /// Parse a route identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidRouteId> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidRouteId {
                reason: "must not be empty",
            });
        }

        if trimmed.chars().any(char::is_control) {
            return Err(InvalidRouteId {
                reason: "must not contain control characters",
            });
        }

        Ok(RouteId(trimmed.to_string()))
    }

    /// Returns the route identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RouteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RouteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RouteId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// The set of routes a leg may be ridden on.
///
/// Ordered so that display and serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteSet(BTreeSet<RouteId>);

impl RouteSet {
    /// Create an empty route set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a route set from string identifiers.
    pub fn parse<'a>(routes: impl IntoIterator<Item = &'a str>) -> Result<Self, InvalidRouteId> {
        routes
            .into_iter()
            .map(RouteId::parse)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(RouteSet)
    }

    /// Add a route to the set.
    pub fn insert(&mut self, route: RouteId) -> bool {
        self.0.insert(route)
    }

    /// Returns true if `route` is permitted.
    pub fn contains(&self, route: &RouteId) -> bool {
        self.0.contains(route)
    }

    /// Returns the union of this set and `other`.
    pub fn union(&self, other: &RouteSet) -> RouteSet {
        RouteSet(self.0.union(&other.0).cloned().collect())
    }

    /// Extend this set with every route in `other`.
    pub fn extend_from(&mut self, other: &RouteSet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Number of routes in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no route is permitted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate routes in order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteId> {
        self.0.iter()
    }

    /// Route identifiers as owned strings, for presentation.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|r| r.0.clone()).collect()
    }
}

impl FromIterator<RouteId> for RouteSet {
    fn from_iter<I: IntoIterator<Item = RouteId>>(iter: I) -> Self {
        RouteSet(iter.into_iter().collect())
    }
}

impl fmt::Display for RouteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, route) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(route.as_str())?;
        }
        Ok(())
    }
}

//! Stop identifier type.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Longest stop identifier we accept.
const MAX_LEN: usize = 16;

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// An upstream-assigned transit stop identifier (e.g. `"16320"`).
///
/// Stop IDs are interpolated into the request path of the departure-board
/// API, so only short ASCII alphanumeric strings are accepted. Any `StopId`
/// value is valid by construction.
///
/// # Examples
///
/// ```
/// use nextrip_server::domain::StopId;
///
/// let stop = StopId::parse("16320").unwrap();
/// assert_eq!(stop.as_str(), "16320");
///
/// assert!(StopId::parse("").is_err());
/// assert!(StopId::parse("16/320").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StopId(String);

impl StopId {
    /// Parse a stop identifier from a string.
    ///
    /// The input must be 1 to 16 ASCII letters or digits.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        if s.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_LEN {
            return Err(InvalidStopId {
                reason: "must be at most 16 characters",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidStopId {
                reason: "must be ASCII letters or digits",
            });
        }

        Ok(StopId(s.to_string()))
    }

    /// Returns the stop identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StopId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StopId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        StopId::parse(&s).map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[A-Za-z0-9]{1,16}") {
            let stop = StopId::parse(&s).unwrap();
            prop_assert_eq!(stop.as_str(), s.as_str());
        }

        /// Anything containing a separator is rejected
        #[test]
        fn separators_rejected(a in "[0-9]{1,5}", sep in "[/?#&. -]", b in "[0-9]{1,5}") {
            let s = format!("{a}{sep}{b}");
            prop_assert!(StopId::parse(&s).is_err());
        }
    }
}

//! Departure-board timestamps.
//!
//! The upstream API reports departure times as vendor strings of the form
//! `/Date(1539990000000-0500)/`. Only the 13-digit epoch-millisecond field
//! is used; the zone offset is ignored because every comparison in the
//! estimator is relative. Journeys spanning a DST changeover are not
//! handled specially.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Leading literal of a vendor timestamp once JSON escapes are removed.
const DATE_PREFIX: &str = "/Date(";

/// End (exclusive) of the epoch-millisecond field within a vendor timestamp.
const EPOCH_END: usize = 19;

/// Error returned when a vendor timestamp does not match `/Date(<13 digits>...`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed timestamp {input:?}: {reason}")]
pub struct MalformedTimestamp {
    input: String,
    reason: &'static str,
}

impl MalformedTimestamp {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A point in time as integer milliseconds since the Unix epoch.
///
/// # Examples
///
/// ```
/// use nextrip_server::domain::EpochMillis;
/// use chrono::Duration;
///
/// let t = EpochMillis::new(1_539_990_000_000);
/// let later = t.checked_add(Duration::seconds(360)).unwrap();
/// assert_eq!(later.as_millis(), 1_539_990_360_000);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochMillis(i64);

impl EpochMillis {
    /// Wrap a raw millisecond count.
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Returns the raw millisecond count.
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Add a duration, returning `None` on overflow.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        self.0.checked_add(duration.num_milliseconds()).map(Self)
    }

    /// Converts to a UTC datetime, if representable.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Debug for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpochMillis({})", self.0)
    }
}

impl fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_utc() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Extract the epoch-millisecond field from a vendor timestamp.
///
/// Accepts the JSON-decoded form (`/Date(...)/`) as well as the raw escaped
/// form (`\/Date(...)\/`) seen in logs and fixtures.
///
/// # Examples
///
/// ```
/// use nextrip_server::domain::parse_timestamp;
///
/// let t = parse_timestamp("/Date(1539990000000-0500)/").unwrap();
/// assert_eq!(t.as_millis(), 1539990000000);
///
/// let t = parse_timestamp(r"\/Date(1539990000000-0500)\/").unwrap();
/// assert_eq!(t.as_millis(), 1539990000000);
///
/// assert!(parse_timestamp("/Date(15399)/").is_err());
/// assert!(parse_timestamp("/Date(15399x0000000-0500)/").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<EpochMillis, MalformedTimestamp> {
    let unescaped = s.strip_prefix('\\').unwrap_or(s);

    if !unescaped.starts_with(DATE_PREFIX) {
        return Err(MalformedTimestamp::new(s, "expected /Date( prefix"));
    }

    let digits = unescaped
        .get(DATE_PREFIX.len()..EPOCH_END)
        .ok_or_else(|| MalformedTimestamp::new(s, "too short for a 13-digit epoch"))?;

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MalformedTimestamp::new(s, "epoch field is not numeric"));
    }

    digits
        .parse::<i64>()
        .map(EpochMillis)
        .map_err(|_| MalformedTimestamp::new(s, "epoch field out of range"))
}

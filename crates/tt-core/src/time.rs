//! Second-precision time values and their string encodings.
//!
//! Timestamps are timezone-less wall-clock values stored as
//! `YYYY-MM-DDTHH:MM:SS`. Sub-second precision is dropped at construction,
//! so a stored timestamp parses back to exactly the same value.
//!
//! Durations are persisted as a whole number of seconds and rendered for
//! humans as `{hours}h{minutes}m{seconds}s`, with days folded into hours.

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Byte layout of `YYYY-MM-DDTHH:MM:SS`; `None` marks a digit position.
const TIMESTAMP_SHAPE: [Option<u8>; 19] = [
    None,
    None,
    None,
    None,
    Some(b'-'),
    None,
    None,
    Some(b'-'),
    None,
    None,
    Some(b'T'),
    None,
    None,
    Some(b':'),
    None,
    None,
    Some(b':'),
    None,
    None,
];

/// Errors from decoding time values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The string is not a `YYYY-MM-DDTHH:MM:SS` timestamp.
    #[error("invalid timestamp {input:?}: expected YYYY-MM-DDTHH:MM:SS")]
    Timestamp { input: String },

    /// The second count cannot be represented as a duration.
    #[error("invalid duration: {seconds} seconds")]
    Duration { seconds: i64 },
}

/// A wall-clock instant with whole-second precision and no timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Wraps a naive datetime, truncating sub-second precision.
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        Self(datetime.trunc_subsecs(0))
    }

    /// Current local time, truncated to whole seconds.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Returns the timestamp `duration` later, or `None` on overflow.
    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        self.0.checked_add_signed(duration).map(Self::from_naive)
    }
}

impl Sub for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0 - rhs.0
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::from_naive(datetime)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_timestamp(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a `YYYY-MM-DDTHH:MM:SS` timestamp.
///
/// The layout is checked before calendar validation, so single-digit fields,
/// fractional seconds, offsets and trailing text are all rejected.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, FormatError> {
    let invalid = || FormatError::Timestamp {
        input: s.to_string(),
    };

    let bytes = s.as_bytes();
    if bytes.len() != TIMESTAMP_SHAPE.len() {
        return Err(invalid());
    }
    let shape_ok = bytes
        .iter()
        .zip(TIMESTAMP_SHAPE)
        .all(|(&byte, expected)| match expected {
            Some(separator) => byte == separator,
            None => byte.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(invalid());
    }

    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(Timestamp::from_naive)
        .map_err(|_| invalid())
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp.to_string()
}

/// Renders a duration as `{H}h{M}m{S}s`, folding days into hours.
///
/// Negative durations render as `0h0m0s`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = total % 3600 / 60;
    let seconds = total % 60;
    format!("{hours}h{minutes}m{seconds}s")
}

/// Whole seconds in a duration, truncating any sub-second part.
pub fn duration_to_seconds(duration: Duration) -> i64 {
    duration.num_seconds()
}

/// Rebuilds a duration from a persisted second count.
pub fn duration_from_seconds(seconds: i64) -> Result<Duration, FormatError> {
    if seconds < 0 {
        return Err(FormatError::Duration { seconds });
    }
    Duration::try_seconds(seconds).ok_or(FormatError::Duration { seconds })
}

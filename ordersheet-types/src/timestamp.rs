//! ISO-8601 instants with lenient parsing and canonical output.
//!
//! Spreadsheet cells carry dates in whatever shape a human typed them.
//! Parsing accepts a handful of common layouts; output is always the
//! canonical `YYYY-MM-DDTHH:MM:SS.sssZ` form. Values are truncated to
//! millisecond precision on the way in so the canonical form round-trips.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Naive date-time layouts, interpreted as UTC.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layouts, interpreted as UTC midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

const DAYS_PER_YEAR: f64 = 365.25;

/// A UTC instant with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsoTimestamp(DateTime<Utc>);

impl IsoTimestamp {
    /// The current instant.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wraps a `DateTime`, dropping sub-millisecond precision.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(3))
    }

    /// Parses a human-entered date or date-time.
    ///
    /// Returns `None` for empty or unrecognised input. Offsets are honoured;
    /// values without an offset are taken as UTC.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self::from_datetime(dt.with_timezone(&Utc)));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(Self::from_datetime(dt.with_timezone(&Utc)));
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Self::from_datetime(naive.and_utc()));
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date
                    .and_hms_opt(0, 0, 0)
                    .map(|naive| Self::from_datetime(naive.and_utc()));
            }
        }
        None
    }

    /// Returns the wrapped `DateTime`.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Canonical `YYYY-MM-DDTHH:MM:SS.sssZ` rendering.
    #[must_use]
    pub fn to_iso_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Distance from `reference` in (fractional) years, either direction.
    #[must_use]
    pub fn years_from(&self, reference: &Self) -> f64 {
        let days = (self.0 - reference.0).num_days().abs();
        days as f64 / DAYS_PER_YEAR
    }

    /// True when this instant lies more than `years` away from `reference`.
    #[must_use]
    pub fn exceeds_horizon(&self, years: u32, reference: &Self) -> bool {
        self.years_from(reference) > f64::from(years)
    }
}

impl Default for IsoTimestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for IsoTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl FromStr for IsoTimestamp {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::InvalidTimestamp(s.to_string()))
    }
}

impl From<DateTime<Utc>> for IsoTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl Serialize for IsoTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for IsoTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

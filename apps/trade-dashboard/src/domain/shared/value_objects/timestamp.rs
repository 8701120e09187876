//! Timestamp value object for trade close times.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unix values at or above this are read as milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Naive date-time layouts accepted from data sources, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, interpreted as midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// A UTC instant at which a trade closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a new Timestamp from a DateTime<Utc>.
    #[must_use]
    pub const fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the current timestamp.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse from an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not a valid RFC 3339 timestamp.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(dt.with_timezone(&Utc)))
    }

    /// Parse any of the layouts the supported data sources emit.
    ///
    /// Tries RFC 3339 first, then naive date-times (UTC), then bare dates.
    /// Returns `None` when nothing matches.
    #[must_use]
    pub fn parse_flexible(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(ts) = Self::parse(s) {
            return Some(ts);
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Some(Self(Utc.from_utc_datetime(&naive)));
            }
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                let naive = date.and_hms_opt(0, 0, 0)?;
                return Some(Self(Utc.from_utc_datetime(&naive)));
            }
        }

        None
    }

    /// Build from a Unix epoch value in seconds, or milliseconds for large values.
    #[must_use]
    pub fn from_unix(value: i64) -> Option<Self> {
        let dt = if value.abs() >= MILLIS_THRESHOLD {
            DateTime::from_timestamp_millis(value)?
        } else {
            DateTime::from_timestamp(value, 0)?
        };
        Some(Self(dt))
    }

    /// Get the inner DateTime<Utc>.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Format as RFC 3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Calendar date in `YYYY-MM-DD` form.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Get the Unix timestamp in seconds.
    #[must_use]
    pub fn unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_parse() {
        let ts = Timestamp::parse("2026-01-19T12:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-19T12:00:00+00:00");
    }

    #[test]
    fn timestamp_parse_invalid() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse_flexible("not-a-date").is_none());
        assert!(Timestamp::parse_flexible("   ").is_none());
    }

    #[test]
    fn parse_flexible_with_offset() {
        let ts = Timestamp::parse_flexible("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T08:00:00+00:00");
    }

    #[test]
    fn parse_flexible_naive_is_utc() {
        let ts = Timestamp::parse_flexible("2024-03-01 10:15:30").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T10:15:30+00:00");

        let ts = Timestamp::parse_flexible("2024-03-01T10:15:30.250").unwrap();
        assert_eq!(ts.unix_seconds(), 1_709_288_130);
    }

    #[test]
    fn parse_flexible_sheet_format() {
        let ts = Timestamp::parse_flexible("1/15/2024 14:30:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T14:30:00+00:00");
    }

    #[test]
    fn parse_flexible_date_only() {
        let ts = Timestamp::parse_flexible("2024-01-15").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T00:00:00+00:00");
        assert_eq!(ts.date_string(), "2024-01-15");
    }

    #[test]
    fn from_unix_seconds_and_millis() {
        let secs = Timestamp::from_unix(1_705_329_000).unwrap();
        let millis = Timestamp::from_unix(1_705_329_000_000).unwrap();
        assert_eq!(secs, millis);
    }

    #[test]
    fn timestamp_ordering() {
        let earlier = Timestamp::parse("2024-01-01T00:00:00Z").unwrap();
        let later = Timestamp::parse("2024-01-02T00:00:00Z").unwrap();
        assert!(earlier < later);
    }
}

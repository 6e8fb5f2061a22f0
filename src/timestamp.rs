//! UTC timestamp helpers
//!
//! Timestamps are stored as RFC 3339 text with microsecond precision and a
//! `Z` suffix, e.g. `2021-05-01T12:30:00.000000Z`.

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use thiserror::Error;

/// Timestamp parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("Invalid timestamp '{0}'")]
    Invalid(String),
}

/// Current time in storage format
pub fn timestamp() -> String {
    to_storage_timestamp(&timestamp_now())
}

/// Formats a UTC time in storage format
pub fn to_storage_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a storage-format timestamp.
///
/// The `Z` suffix is optional; other offsets are accepted and converted.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, TimestampError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError::Invalid(text.to_string()))
}

pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time cut to the precision storage keeps, so the value survives a
/// format/parse round trip unchanged
pub fn storage_now() -> DateTime<Utc> {
    timestamp_now().trunc_subsecs(6)
}

pub fn now_plus_seconds(seconds: i64) -> DateTime<Utc> {
    timestamp_now() + Duration::seconds(seconds)
}

pub fn now_plus_minutes(minutes: i64) -> DateTime<Utc> {
    timestamp_now() + Duration::minutes(minutes)
}

pub fn now_plus_hours(hours: i64) -> DateTime<Utc> {
    timestamp_now() + Duration::hours(hours)
}

pub fn now_plus_days(days: i64) -> DateTime<Utc> {
    timestamp_now() + Duration::days(days)
}

pub fn now_plus_weeks(weeks: i64) -> DateTime<Utc> {
    timestamp_now() + Duration::weeks(weeks)
}

//! Wire date handling.
//!
//! The chart client transmits date fields as strings whose exact shape
//! depends on how the value was produced (serialized `Date`, date picker,
//! imported data). Accept the common forms and normalize everything to UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::de::{self, Deserialize, Deserializer};

/// Parses a single wire date string.
///
/// Accepted forms, tried in order: RFC 3339 (with offset or `Z`), a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` datetime taken as UTC, the same with a space
/// separator, and a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    None
}

/// Deserializes an optional wire date; `null` and an absent field both give
/// `None`, an unparseable string is a decode error.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unrecognized date string: {}", raw))),
    }
}

/// Patch-field variant of [`deserialize_opt`]: distinguishes an absent field
/// (serde default, `None`) from an explicit `null` (`Some(None)`, clears the
/// stored date).
pub fn deserialize_double_opt<'de, D>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_opt(deserializer).map(Some)
}

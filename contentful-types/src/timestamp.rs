//! Timestamp parsing and formatting in the API's JSON representation.
//!
//! The delivery API emits UTC timestamps with millisecond precision, e.g.
//! `2013-09-02T14:56:34.240Z`. Formatting writes the fractional part only
//! when it is non-zero, so both `…:34.240Z` and `…:34Z` survive a
//! parse/format cycle unchanged.
//!
//! `Date` entry fields are more lenient than `sys` timestamps: editors may
//! store a bare date (`2015-01-01`), a minute-precision local time
//! (`2015-01-01T12:00`) or an offset time without seconds
//! (`2015-01-01T12:00+01:00`). Values without an offset are taken as UTC.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses a timestamp as emitted by the API or stored in a `Date` field.
pub fn parse(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z") {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(Error::InvalidTimestamp(value.to_string()))
}

/// Formats a timestamp the way the API does.
#[must_use]
pub fn format(value: &DateTime<Utc>) -> String {
    let seconds = value.format("%Y-%m-%dT%H:%M:%S");
    match value.timestamp_subsec_millis() {
        0 => format!("{seconds}Z"),
        millis => format!("{seconds}.{millis:03}Z"),
    }
}

/// Serde adapter for `Option<DateTime<Utc>>` fields in API format.
///
/// Use together with `#[serde(default)]` so absent keys decode to `None`.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&super::format(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|value| super::parse(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}

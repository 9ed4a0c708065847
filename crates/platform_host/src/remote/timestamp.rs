//! Conversion between unix-millisecond stamps and the backend's ISO-8601 timestamp columns.
//!
//! Writes use the browser `Date.toISOString()` shape (`2024-05-01T12:00:00.000Z`). Reads accept
//! any RFC 3339 offset, offset-less `timestamp` values (taken as UTC) and bare integers.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Formats unix milliseconds as an RFC 3339 UTC string with millisecond precision.
pub fn rfc3339_from_ms(ms: u64) -> String {
    let stamp = i64::try_from(ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    stamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a backend timestamp into unix milliseconds. Pre-epoch and malformed values yield `None`.
pub fn ms_from_rfc3339(text: &str) -> Option<u64> {
    let millis = match DateTime::parse_from_rfc3339(text) {
        Ok(stamp) => stamp.timestamp_millis(),
        Err(_) => {
            let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
                .ok()?;
            Utc.from_utc_datetime(&naive).timestamp_millis()
        }
    };
    u64::try_from(millis).ok()
}

/// `#[serde(with = ...)]` adapter for optional timestamp columns.
pub mod option_rfc3339 {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawStamp {
        Text(String),
        Millis(u64),
    }

    /// Writes `Some(ms)` as an RFC 3339 string and `None` as `null`.
    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(ms) => serializer.serialize_some(&rfc3339_from_ms(*ms)),
            None => serializer.serialize_none(),
        }
    }

    /// Reads a string, integer or `null` column.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        match Option::<RawStamp>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawStamp::Millis(ms)) => Ok(Some(ms)),
            Some(RawStamp::Text(text)) => ms_from_rfc3339(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{text}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn formats_like_browser_iso_strings() {
        assert_eq!(rfc3339_from_ms(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(rfc3339_from_ms(1_714_564_800_123), "2024-05-01T12:00:00.123Z");
    }

    #[test]
    fn parses_server_stamped_values() {
        assert_eq!(ms_from_rfc3339("2024-05-01T12:00:00.123Z"), Some(1_714_564_800_123));
        assert_eq!(
            ms_from_rfc3339("2024-05-01T14:00:00.123456+02:00"),
            Some(1_714_564_800_123)
        );
        assert_eq!(ms_from_rfc3339("2024-05-01T12:00:00"), Some(1_714_564_800_000));
        assert_eq!(ms_from_rfc3339("2024-05-01 12:00:00.5"), Some(1_714_564_800_500));
        assert_eq!(ms_from_rfc3339("yesterday"), None);
        assert_eq!(ms_from_rfc3339("1969-12-31T23:59:59Z"), None);
    }
}

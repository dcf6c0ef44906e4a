//! Timestamp helpers
//!
//! The Gateway emits ISO-8601 timestamps without an offset suffix
//! (naive UTC). [`iso_utc`] accepts both the naive and the
//! offset-bearing form and always serializes back as RFC 3339.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a Gateway timestamp, treating offset-less values as UTC.
pub fn parse_iso_utc(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()),
    }
}

/// Serde adapter for `DateTime<Utc>` fields carried as Gateway timestamps.
pub mod iso_utc {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::parse_iso_utc;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_iso_utc(&raw).map_err(de::Error::custom)
    }

    /// Same adapter for `Option<DateTime<Utc>>` fields.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer, de};

        use crate::time::parse_iso_utc;

        pub fn serialize<S>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.as_deref()
                .map(parse_iso_utc)
                .transpose()
                .map_err(de::Error::custom)
        }
    }
}

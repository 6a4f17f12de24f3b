//! Timestamps in the browser's `Date.toISOString()` form: RFC 3339, UTC,
//! millisecond precision, e.g. `2024-03-01T10:00:00.000Z`.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Current time, truncated to what the stored form keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Any RFC 3339 timestamp, normalized to UTC.
pub fn parse(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The calendar day `ts` falls on in local time.
pub fn local_day(ts: &DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Local midnight of `day`, the instant a date picker stores.
pub fn start_of_local_day(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// `#[serde(with = "...")]` for a `DateTime<Utc>` field.
pub mod rfc3339 {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| D::Error::custom(format!("invalid timestamp {:?}", text)))
    }
}

/// `#[serde(with = "...")]` for an optional due date. Written as local
/// midnight in timestamp form; read from a timestamp or a bare `YYYY-MM-DD`.
pub mod due_date {
    use super::*;

    pub fn serialize<S: Serializer>(day: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match day {
            Some(day) => serializer.serialize_some(&format(&start_of_local_day(*day))),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if let Some(ts) = parse(&text) {
            return Ok(Some(local_day(&ts)));
        }
        NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid due date {:?}", text)))
    }
}

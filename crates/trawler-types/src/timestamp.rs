use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Parse a backend timestamp. The backend mixes RFC 3339 strings with
/// MySQL-style "YYYY-MM-DD HH:MM:SS" values that carry no timezone; those are
/// read as naive UTC.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|ndt| ndt.and_utc()))
        .ok()
}

/// Epoch values above this are taken as milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Epoch(i64),
    Fractional(f64),
    Other(IgnoredAny),
}

fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.abs() >= MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

/// `deserialize_with` helper for optional, possibly malformed timestamps.
/// Accepts strings and epoch seconds or milliseconds; anything else becomes
/// `None` instead of failing the whole payload.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<RawTimestamp>::deserialize(deserializer)? {
        None => None,
        Some(RawTimestamp::Text(value)) => {
            let parsed = parse(&value);
            if parsed.is_none() && !value.is_empty() {
                warn!("Ignoring unparseable timestamp '{}'", value);
            }
            parsed
        }
        Some(RawTimestamp::Epoch(value)) => from_epoch(value),
        Some(RawTimestamp::Fractional(value)) => from_epoch(value as i64),
        Some(RawTimestamp::Other(_)) => {
            warn!("Ignoring non-scalar timestamp");
            None
        }
    };
    Ok(parsed)
}

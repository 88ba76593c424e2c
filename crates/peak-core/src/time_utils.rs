use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::Value;
use tracing::warn;

// ── Day boundaries ────────────────────────────────────────────────────────────

/// UTC calendar day containing `ts`.
pub fn utc_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Midnight UTC at the start of `date`.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Midnight UTC of the day following the day that contains `ts`.
///
/// Returns `None` only when `ts` lies on the last representable date.
pub fn next_day_boundary(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    utc_date(ts).succ_opt().map(day_start)
}

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Parse a JSON value into a UTC [`DateTime`].
///
/// Handles:
/// * JSON number → Unix epoch milliseconds (integer or float).
/// * JSON string → all-digit strings as epoch milliseconds, RFC 3339 with
///   `Z` or an explicit offset, or a naive date-time read as UTC.
/// * anything else → `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            if let Some(millis) = n.as_i64() {
                DateTime::from_timestamp_millis(millis)
            } else if let Some(f) = n.as_f64() {
                DateTime::from_timestamp_millis(f.round() as i64)
            } else {
                None
            }
        }
        Value::String(s) => parse_timestamp_str(s),
        _ => None,
    }
}

/// Parse a timestamp string; see [`parse_timestamp`] for accepted forms.
pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in FORMATS {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    warn!("could not parse timestamp string \"{}\"", s);
    None
}

// ── Serde adapter ─────────────────────────────────────────────────────────────

/// `#[serde(with = "...")]` adapter: writes epoch milliseconds, reads anything
/// [`parse_timestamp`] understands.
pub mod epoch_millis {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(ts.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        super::parse_timestamp(&value)
            .ok_or_else(|| D::Error::custom(format!("unrecognised timestamp: {value}")))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

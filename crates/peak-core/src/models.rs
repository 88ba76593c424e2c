use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::time_utils::{epoch_millis, utc_date};

/// One phone call as supplied by the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    /// Opaque identifier, unique per original call. Numeric ids on the wire
    /// are kept as their decimal text.
    #[serde(deserialize_with = "opaque_id")]
    pub call_id: String,
    /// Customer that placed or received the call.
    pub customer_id: i64,
    /// When the call started (UTC).
    #[serde(with = "epoch_millis")]
    pub start_timestamp: DateTime<Utc>,
    /// When the call ended (UTC). Never earlier than `start_timestamp` in valid input.
    #[serde(with = "epoch_millis")]
    pub end_timestamp: DateTime<Utc>,
}

impl CallRecord {
    pub fn new(
        call_id: impl Into<String>,
        customer_id: i64,
        start_timestamp: DateTime<Utc>,
        end_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            customer_id,
            start_timestamp,
            end_timestamp,
        }
    }

    /// `true` when the call does not end before it starts.
    pub fn is_well_ordered(&self) -> bool {
        self.start_timestamp <= self.end_timestamp
    }
}

/// Read a call id given as either a JSON string or a JSON number.
fn opaque_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or number call id, found {other}"
        ))),
    }
}

/// A call record clipped to a single UTC calendar day.
///
/// A call that crosses midnight produces two segments with the same
/// `call_id`; the first ends and the second starts at the same boundary
/// instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSegment {
    pub call_id: String,
    pub customer_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CallSegment {
    /// The UTC day this segment is attributed to (the day of its start).
    pub fn date(&self) -> NaiveDate {
        utc_date(self.start)
    }

    /// `true` when the segment starts and ends at the same instant.
    pub fn is_instantaneous(&self) -> bool {
        self.start == self.end
    }
}

impl From<&CallRecord> for CallSegment {
    fn from(record: &CallRecord) -> Self {
        Self {
            call_id: record.call_id.clone(),
            customer_id: record.customer_id,
            start: record.start_timestamp,
            end: record.end_timestamp,
        }
    }
}

/// Peak concurrency for one customer on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub customer_id: i64,
    /// Calendar day (UTC), serialised as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Highest number of calls in progress at the same instant.
    pub max_concurrent_calls: usize,
    /// First instant at which `max_concurrent_calls` was reached.
    #[serde(with = "epoch_millis")]
    pub timestamp: DateTime<Utc>,
    /// Calls active at `timestamp`, in the order they became active.
    pub call_ids: Vec<String>,
}

//! Day-boundary segmentation of call records.

use peak_core::error::{PeakError, Result};
use peak_core::models::{CallRecord, CallSegment};
use peak_core::time_utils::{day_start, next_day_boundary, utc_date};
use tracing::debug;

/// Split every record into same-day segments.
///
/// All records are validated before any is split; the first record whose
/// end precedes its start aborts the run with [`PeakError::InvalidTimestamp`].
pub fn segment_calls(records: &[CallRecord]) -> Result<Vec<CallSegment>> {
    validate_records(records)?;

    let mut segments = Vec::with_capacity(records.len());
    for record in records {
        segments.extend(split_record(record));
    }

    debug!(
        "segmented {} records into {} segments",
        records.len(),
        segments.len()
    );
    Ok(segments)
}

/// Fail on the first record that ends before it starts.
pub fn validate_records(records: &[CallRecord]) -> Result<()> {
    match records.iter().find(|r| !r.is_well_ordered()) {
        Some(bad) => Err(PeakError::InvalidTimestamp {
            call_id: bad.call_id.clone(),
            start: bad.start_timestamp,
            end: bad.end_timestamp,
        }),
        None => Ok(()),
    }
}

/// Split one well-ordered record at the first UTC midnight after its start.
///
/// Same-day records come back as a single unchanged segment. Otherwise the
/// result is `[start, boundary]` and `[boundary, end]`: the boundary instant
/// belongs to both halves. Records spanning more than two days are clamped
/// at the first boundary only, so the second half may itself cross midnight.
pub fn split_record(record: &CallRecord) -> Vec<CallSegment> {
    let start_day = utc_date(record.start_timestamp);
    let end_day = utc_date(record.end_timestamp);

    if start_day == end_day {
        return vec![CallSegment::from(record)];
    }

    let boundary =
        next_day_boundary(record.start_timestamp).unwrap_or_else(|| day_start(end_day));

    vec![
        CallSegment {
            end: boundary,
            ..CallSegment::from(record)
        },
        CallSegment {
            start: boundary,
            ..CallSegment::from(record)
        },
    ]
}

//! Parallel per-group analysis.
//!
//! Groups are independent, so they are split into batches and summarised on
//! tokio's blocking pool. Completion order is arbitrary; the merged output is
//! re-sorted so it matches [`CallAggregator::aggregate`] exactly.

use std::num::NonZeroUsize;

use peak_core::error::{PeakError, Result};
use peak_core::models::{CallRecord, DailySummary};
use peak_data::aggregator::{CallAggregator, CallGroup};
use peak_data::segmenter::segment_calls;
use tokio::task::{JoinError, JoinSet};

/// Number of batches to use when the caller does not choose one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Map a panicked or cancelled blocking task onto [`PeakError::Task`].
pub(crate) fn task_failed(err: JoinError) -> PeakError {
    PeakError::Task(err.to_string())
}

/// Same contract as [`CallAggregator::aggregate`], with groups analysed on up
/// to `workers` blocking tasks.
///
/// Invalid records fail before any task is spawned. The first failing batch
/// aborts the run; batches still queued are dropped with the [`JoinSet`].
pub async fn analyze_parallel(records: &[CallRecord], workers: usize) -> Result<Vec<DailySummary>> {
    let segments = segment_calls(records)?;
    let groups = CallAggregator::group(segments);
    let group_count = groups.len();

    let batches = into_batches(groups, workers.max(1));
    tracing::debug!(
        groups = group_count,
        batches = batches.len(),
        "dispatching call groups"
    );

    let mut set = JoinSet::new();
    for batch in batches {
        set.spawn_blocking(move || {
            batch
                .iter()
                .map(CallAggregator::summarize)
                .collect::<Result<Vec<DailySummary>>>()
        });
    }

    let mut summaries = Vec::with_capacity(group_count);
    while let Some(joined) = set.join_next().await {
        let batch = joined.map_err(task_failed)??;
        summaries.extend(batch);
    }

    summaries.sort_by_key(|s| (s.customer_id, s.date));
    Ok(summaries)
}

/// Split `groups` into at most `workers` contiguous batches of near-equal size.
fn into_batches(groups: Vec<CallGroup>, workers: usize) -> Vec<Vec<CallGroup>> {
    let chunk_size = groups.len().div_ceil(workers).max(1);
    let mut batches = Vec::with_capacity(workers);
    let mut iter = groups.into_iter();
    loop {
        let batch: Vec<CallGroup> = iter.by_ref().take(chunk_size).collect();
        if batch.is_empty() {
            break;
        }
        batches.push(batch);
    }
    batches
}

// ── Tests ─────────────────────────────────────────────────────────────────────

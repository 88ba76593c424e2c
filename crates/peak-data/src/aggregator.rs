//! Per-customer, per-day aggregation of call segments.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use peak_core::error::{PeakError, Result};
use peak_core::models::{CallRecord, CallSegment, DailySummary};
use tracing::debug;

use crate::analyzer::ConcurrencyAnalyzer;
use crate::segmenter::segment_calls;

// ── GroupKey ──────────────────────────────────────────────────────────────────

/// Identifies one (customer, UTC day) partition. Orders by customer, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub customer_id: i64,
    pub date: NaiveDate,
}

impl GroupKey {
    /// Key of the group `segment` belongs to.
    pub fn of(segment: &CallSegment) -> Self {
        Self {
            customer_id: segment.customer_id,
            date: segment.date(),
        }
    }
}

// ── CallGroup ─────────────────────────────────────────────────────────────────

/// The segments of one customer on one day. Built once by
/// [`CallAggregator::group`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct CallGroup {
    key: GroupKey,
    segments: Vec<CallSegment>,
}

impl CallGroup {
    pub fn key(&self) -> GroupKey {
        self.key
    }

    pub fn customer_id(&self) -> i64 {
        self.key.customer_id
    }

    pub fn date(&self) -> NaiveDate {
        self.key.date
    }

    /// Segments in input order.
    pub fn segments(&self) -> &[CallSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

// ── ReportTotals ──────────────────────────────────────────────────────────────

/// Cross-group figures for the end-of-run log line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTotals {
    /// Number of (customer, day) summaries.
    pub groups: usize,
    /// Number of distinct customers.
    pub customers: usize,
    /// Highest `max_concurrent_calls` over all summaries.
    pub max_concurrent_calls: usize,
    /// The first summary (in output order) reaching that maximum.
    pub busiest: Option<GroupKey>,
}

// ── CallAggregator ────────────────────────────────────────────────────────────

/// Stateless helper that turns call records into daily summaries.
pub struct CallAggregator;

impl CallAggregator {
    /// Segment, group and analyse `records`.
    ///
    /// Returns one summary per (customer, day), sorted by customer id then
    /// date. Empty input yields an empty list.
    pub fn aggregate(records: &[CallRecord]) -> Result<Vec<DailySummary>> {
        let segments = segment_calls(records)?;
        let groups = Self::group(segments);
        debug!("analysing {} call groups", groups.len());
        groups.iter().map(Self::summarize).collect()
    }

    /// Partition segments by (customer, day of start) in a single pass.
    ///
    /// Groups come back sorted by [`GroupKey`]; segments inside a group keep
    /// their input order.
    pub fn group(segments: Vec<CallSegment>) -> Vec<CallGroup> {
        let mut map: BTreeMap<GroupKey, Vec<CallSegment>> = BTreeMap::new();
        for segment in segments {
            map.entry(GroupKey::of(&segment)).or_default().push(segment);
        }

        map.into_iter()
            .map(|(key, segments)| CallGroup { key, segments })
            .collect()
    }

    /// Run the sweep over one group.
    ///
    /// `call_ids` in the summary are the calls active at the peak instant,
    /// not every call touching the day.
    pub fn summarize(group: &CallGroup) -> Result<DailySummary> {
        let peak = ConcurrencyAnalyzer::analyze(group.segments());

        let timestamp = match peak.peak_start {
            Some(ts) if !group.is_empty() => ts,
            _ => {
                return Err(PeakError::EmptyGroup {
                    customer_id: group.customer_id(),
                    date: group.date(),
                })
            }
        };

        Ok(DailySummary {
            customer_id: group.customer_id(),
            date: group.date(),
            max_concurrent_calls: peak.max_concurrent,
            timestamp,
            call_ids: peak.call_ids,
        })
    }

    /// Sum up figures across all summaries into a [`ReportTotals`].
    pub fn calculate_totals(summaries: &[DailySummary]) -> ReportTotals {
        let customers: BTreeSet<i64> = summaries.iter().map(|s| s.customer_id).collect();

        let mut totals = ReportTotals {
            groups: summaries.len(),
            customers: customers.len(),
            ..ReportTotals::default()
        };
        for summary in summaries {
            if summary.max_concurrent_calls > totals.max_concurrent_calls {
                totals.max_concurrent_calls = summary.max_concurrent_calls;
                totals.busiest = Some(GroupKey {
                    customer_id: summary.customer_id,
                    date: summary.date,
                });
            }
        }
        totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

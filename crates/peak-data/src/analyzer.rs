//! Sweep-line peak concurrency analysis.
//!
//! Works on the segments of a single customer on a single UTC day and finds
//! the highest number of calls in progress at the same instant.

use chrono::{DateTime, Utc};
use peak_core::models::CallSegment;

// ── Events ────────────────────────────────────────────────────────────────────

/// Kind of sweep event. Declaration order is the tie-break order at equal
/// instants: calls ending at `t` are gone before calls starting at `t` arrive,
/// and instantaneous calls leave only after every start at `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    End,
    Start,
    /// End of a segment whose start and end coincide.
    Release,
}

#[derive(Debug)]
struct SweepEvent<'a> {
    at: DateTime<Utc>,
    kind: EventKind,
    call_id: &'a str,
}

// ── PeakConcurrency ───────────────────────────────────────────────────────────

/// Result of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeakConcurrency {
    /// Highest number of simultaneously active calls.
    pub max_concurrent: usize,
    /// Calls active when the peak was first reached, in activation order.
    pub call_ids: Vec<String>,
    /// First instant at which the peak was reached. `None` for empty input.
    pub peak_start: Option<DateTime<Utc>>,
    /// Latest event instant observed while the count sat at the peak level.
    pub peak_until: Option<DateTime<Utc>>,
}

// ── ConcurrencyAnalyzer ───────────────────────────────────────────────────────

/// Stateless sweep-line analyzer.
pub struct ConcurrencyAnalyzer;

impl ConcurrencyAnalyzer {
    /// Find peak concurrency across `segments`.
    ///
    /// Events are sorted by instant; at equal instants ends come before
    /// starts, so back-to-back calls never overlap. Events of the same kind
    /// at the same instant keep their input order. Segments with
    /// `start == end` count as active at that single instant.
    pub fn analyze(segments: &[CallSegment]) -> PeakConcurrency {
        let events = Self::sorted_events(segments);

        let mut active: Vec<&str> = Vec::with_capacity(segments.len());
        let mut peak = PeakConcurrency::default();

        for event in &events {
            match event.kind {
                EventKind::Start => {
                    active.push(event.call_id);
                    if active.len() > peak.max_concurrent {
                        peak.max_concurrent = active.len();
                        peak.call_ids = active.iter().map(|id| id.to_string()).collect();
                        peak.peak_start = Some(event.at);
                        peak.peak_until = Some(event.at);
                    } else if active.len() == peak.max_concurrent {
                        peak.peak_until = Some(event.at);
                    }
                }
                EventKind::End | EventKind::Release => {
                    if peak.max_concurrent > 0 && active.len() == peak.max_concurrent {
                        peak.peak_until = Some(event.at);
                    }
                    if let Some(pos) = active.iter().position(|id| *id == event.call_id) {
                        active.remove(pos);
                    }
                }
            }
        }

        peak
    }

    /// Two events per segment, ordered for the sweep.
    fn sorted_events(segments: &[CallSegment]) -> Vec<SweepEvent<'_>> {
        let mut events = Vec::with_capacity(segments.len() * 2);
        for segment in segments {
            let end_kind = if segment.is_instantaneous() {
                EventKind::Release
            } else {
                EventKind::End
            };
            events.push(SweepEvent {
                at: segment.start,
                kind: EventKind::Start,
                call_id: &segment.call_id,
            });
            events.push(SweepEvent {
                at: segment.end,
                kind: end_kind,
                call_id: &segment.call_id,
            });
        }
        // Stable: equal (instant, kind) pairs keep input order.
        events.sort_by_key(|e| (e.at, e.kind));
        events
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

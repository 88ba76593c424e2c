//! End-to-end run: dataset in, results document out.

use std::path::PathBuf;
use std::time::Instant;

use peak_core::error::Result;
use peak_core::models::DailySummary;
use peak_data::aggregator::{CallAggregator, ReportTotals};
use peak_data::reader::load_call_records;
use peak_data::writer::write_results;
use tokio::task;

use crate::parallel::{analyze_parallel, default_workers, task_failed};

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything a finished run produced, for logging and tests.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of call records read from the dataset.
    pub records: usize,
    /// Summaries in output order.
    pub summaries: Vec<DailySummary>,
    /// Cross-group figures.
    pub totals: ReportTotals,
    /// Wall-clock seconds spent reading and decoding the dataset.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent segmenting and analysing.
    pub analyze_time_seconds: f64,
}

// ── PeakPipeline ──────────────────────────────────────────────────────────────

/// One-shot pipeline wiring the dataset reader, the engine and the writer.
#[derive(Debug, Clone)]
pub struct PeakPipeline {
    /// Dataset file or directory.
    input: PathBuf,
    /// Results destination; stdout when `None`.
    output: Option<PathBuf>,
    /// Analyse groups on the blocking pool instead of inline.
    parallel: bool,
    /// Batch count for parallel analysis.
    workers: usize,
}

impl PeakPipeline {
    pub fn new(input: PathBuf, output: Option<PathBuf>, parallel: bool) -> Self {
        Self {
            input,
            output,
            parallel,
            workers: default_workers(),
        }
    }

    /// Override the number of parallel batches.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Load, analyse and write. Fails on the first error of any stage.
    pub async fn run(&self) -> Result<RunReport> {
        // ── Step 1: Load records ──────────────────────────────────────────────
        let load_start = Instant::now();
        let input = self.input.clone();
        let records = task::spawn_blocking(move || load_call_records(&input))
            .await
            .map_err(task_failed)??;
        let load_time = load_start.elapsed().as_secs_f64();
        tracing::debug!(records = records.len(), "dataset loaded");

        // ── Step 2: Analyse ───────────────────────────────────────────────────
        let analyze_start = Instant::now();
        let summaries = if self.parallel {
            analyze_parallel(&records, self.workers).await?
        } else {
            CallAggregator::aggregate(&records)?
        };
        let analyze_time = analyze_start.elapsed().as_secs_f64();
        let totals = CallAggregator::calculate_totals(&summaries);

        // ── Step 3: Write results ─────────────────────────────────────────────
        let output = self.output.clone();
        let summaries = task::spawn_blocking(move || {
            write_results(&summaries, output.as_deref()).map(|()| summaries)
        })
        .await
        .map_err(task_failed)??;

        Ok(RunReport {
            records: records.len(),
            summaries,
            totals,
            load_time_seconds: load_time,
            analyze_time_seconds: analyze_time,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

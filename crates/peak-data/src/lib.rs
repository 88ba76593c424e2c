//! Overlap-analysis engine for Call Peak.
//!
//! Splits calls at UTC midnight, groups the resulting segments by customer
//! and day, finds peak concurrency per group with a sweep line, and reads and
//! writes the JSON documents at the edges of a run.

pub mod aggregator;
pub mod analyzer;
pub mod reader;
pub mod segmenter;
pub mod writer;

pub use peak_core as core;

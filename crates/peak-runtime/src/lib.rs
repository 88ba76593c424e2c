//! Runtime layer for Call Peak.
//!
//! Drives one end-to-end run: load the dataset, analyse (customer, day)
//! groups on tokio's blocking pool, and write the results document.

pub mod parallel;
pub mod pipeline;

pub use peak_core as core;
pub use peak_data as data;

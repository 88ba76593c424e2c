//! Shared building blocks for Call Peak.
//!
//! Holds the call/summary data model, the crate-wide error type, UTC
//! day-boundary helpers and the command-line settings.

pub mod error;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{PeakError, Result};

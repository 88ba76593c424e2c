use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// All errors produced by Call Peak.
#[derive(Error, Debug)]
pub enum PeakError {
    /// A call record ends before it starts.
    #[error("Invalid timestamps for call {call_id}: end {end} precedes start {start}")]
    InvalidTimestamp {
        call_id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A (customer, day) group reached the analyzer without any segments.
    #[error("Empty call group for customer {customer_id} on {date}")]
    EmptyGroup { customer_id: i64, date: NaiveDate },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The dataset document parsed as JSON but has the wrong shape.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// The dataset path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No JSON dataset files were found under the given directory.
    #[error("No JSON files found in {0}")]
    NoDataFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A background analysis task panicked or was cancelled.
    #[error("Analysis task failed: {0}")]
    Task(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the Call Peak crates.
pub type Result<T> = std::result::Result<T, PeakError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_error_display_invalid_timestamp() {
        let err = PeakError::InvalidTimestamp {
            call_id: "call-7".to_string(),
            start: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("call-7"));
        assert!(msg.contains("2024-01-01 09:00:00 UTC"));
        assert!(msg.contains("precedes start 2024-01-01 10:00:00 UTC"));
    }

    #[test]
    fn test_error_display_empty_group() {
        let err = PeakError::EmptyGroup {
            customer_id: 42,
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        };
        assert_eq!(err.to_string(), "Empty call group for customer 42 on 2024-03-09");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = PeakError::FileRead {
            path: PathBuf::from("/some/dataset.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/dataset.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_data_path_not_found() {
        let err = PeakError::DataPathNotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "Data path not found: /missing/dir");
    }

    #[test]
    fn test_error_display_no_data_files() {
        let err = PeakError::NoDataFiles(PathBuf::from("/empty/dir"));
        assert_eq!(err.to_string(), "No JSON files found in /empty/dir");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PeakError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: PeakError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}

//! JSON dataset discovery and loading.
//!
//! Accepts either a single dataset file or a directory that is scanned
//! recursively for `.json` files. A dataset is `{"callRecords": [...]}` or a
//! bare array of call records.

use std::path::{Path, PathBuf};

use peak_core::error::{PeakError, Result};
use peak_core::models::CallRecord;
use serde_json::Value;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` files recursively under `data_path`, sorted by path.
pub fn find_dataset_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every call record reachable from `path`.
///
/// A file is read as one dataset. A directory contributes all of its `.json`
/// files in path order. The first unreadable or malformed file aborts the load.
pub fn load_call_records(path: &Path) -> Result<Vec<CallRecord>> {
    if !path.exists() {
        return Err(PeakError::DataPathNotFound(path.to_path_buf()));
    }

    if path.is_file() {
        return read_dataset_file(path);
    }

    let files = find_dataset_files(path);
    if files.is_empty() {
        return Err(PeakError::NoDataFiles(path.to_path_buf()));
    }

    let mut records = Vec::new();
    for file in &files {
        records.extend(read_dataset_file(file)?);
    }

    debug!(
        "Loaded {} call records from {} files",
        records.len(),
        files.len()
    );
    Ok(records)
}

/// Decode a dataset document from a JSON string.
pub fn parse_dataset(content: &str) -> Result<Vec<CallRecord>> {
    let document: Value = serde_json::from_str(content)?;

    let records = match document {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map.remove("callRecords").ok_or_else(|| {
            PeakError::InvalidDataset("missing \"callRecords\" field".to_string())
        })?,
        other => {
            return Err(PeakError::InvalidDataset(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            )))
        }
    };

    Ok(serde_json::from_value(records)?)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_dataset_file(path: &Path) -> Result<Vec<CallRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| PeakError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_dataset(&content)?;
    debug!("{}: {} call records", path.display(), records.len());
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WRAPPED: &str = r#"{
        "callRecords": [
            {"callId": "a", "customerId": 1, "startTimestamp": 1704099600000, "endTimestamp": 1704101400000},
            {"callId": "b", "customerId": 2, "startTimestamp": "2024-01-01T09:15:00Z", "endTimestamp": "2024-01-01T09:45:00Z"}
        ]
    }"#;

    const BARE: &str = r#"[
        {"callId": "c", "customerId": 3, "startTimestamp": 1704099600000, "endTimestamp": 1704101400000}
    ]"#;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    // ── parse_dataset ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_wrapped_document() {
        let records = parse_dataset(WRAPPED).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].call_id, "a");
        assert_eq!(records[1].customer_id, 2);
    }

    #[test]
    fn test_parse_bare_array() {
        let records = parse_dataset(BARE).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].call_id, "c");
    }

    #[test]
    fn test_parse_empty_dataset() {
        assert!(parse_dataset(r#"{"callRecords": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_numeric_call_id() {
        let records = parse_dataset(
            r#"[{"callId": 17, "customerId": 1, "startTimestamp": 1704099600000, "endTimestamp": 1704101400000}]"#,
        )
        .unwrap();
        assert_eq!(records[0].call_id, "17");
    }

    #[test]
    fn test_parse_missing_field() {
        let err = parse_dataset(r#"{"calls": []}"#).unwrap_err();
        assert!(matches!(err, PeakError::InvalidDataset(_)));
    }

    #[test]
    fn test_parse_wrong_top_level() {
        let err = parse_dataset("42").unwrap_err();
        assert_eq!(err.to_string(), "Invalid dataset: expected an object or array, found a number");
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_dataset("{not json").unwrap_err();
        assert!(matches!(err, PeakError::JsonParse(_)));
    }

    // ── find_dataset_files ────────────────────────────────────────────────────

    #[test]
    fn test_find_dataset_files_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "b.json", BARE);
        write_file(tmp.path(), "nested/a.json", BARE);
        write_file(tmp.path(), "notes.txt", "ignore me");

        let files = find_dataset_files(tmp.path());
        assert_eq!(files.len(), 2);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
        assert!(files.iter().all(|f| f.extension().unwrap() == "json"));
    }

    #[test]
    fn test_find_dataset_files_missing_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(find_dataset_files(&tmp.path().join("nope")).is_empty());
    }

    // ── load_call_records ─────────────────────────────────────────────────────

    #[test]
    fn test_load_single_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "dataset.json", WRAPPED);
        let records = load_call_records(&path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_directory_concatenates_in_path_order() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "2.json", BARE);
        write_file(tmp.path(), "1.json", WRAPPED);

        let records = load_call_records(tmp.path()).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.call_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_load_missing_path() {
        let tmp = TempDir::new().unwrap();
        let err = load_call_records(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, PeakError::DataPathNotFound(_)));
    }

    #[test]
    fn test_load_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let err = load_call_records(tmp.path()).unwrap_err();
        assert!(matches!(err, PeakError::NoDataFiles(_)));
    }

    #[test]
    fn test_load_stops_at_malformed_file() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "1.json", WRAPPED);
        write_file(tmp.path(), "2.json", "[{\"callId\": 1}]");
        assert!(load_call_records(tmp.path()).is_err());
    }

    #[test]
    fn test_load_unreadable_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("binary.json");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = load_call_records(&path).unwrap_err();
        assert!(matches!(err, PeakError::FileRead { .. }));
        assert!(err.to_string().contains("binary.json"));
    }
}

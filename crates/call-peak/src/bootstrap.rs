use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── State directory ────────────────────────────────────────────────────────────

/// Root of the per-user state directory, `~/.call-peak/`. Only read from;
/// nothing is created here unless `--log-file` points inside it.
fn state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".call-peak")
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name (`DEBUG`, `WARNING`, ...) to a tracing directive.
/// Unknown names pass through lowercased.
pub fn normalise_level(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Events go to stderr, or are appended to `log_file` when one is given, so
/// stdout stays free for the results document. Falls back to `"info"` if the
/// level string is not a valid filter.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(normalise_level(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate a default dataset when `--input` is not given.
///
/// Checks, in order, and returns the first that exists:
/// 1. `~/.call-peak/dataset.json`
/// 2. `~/.call-peak/datasets/`
pub fn discover_data_path() -> Option<PathBuf> {
    discover_data_path_in(&state_dir())
}

fn discover_data_path_in(root: &Path) -> Option<PathBuf> {
    let candidates = [root.join("dataset.json"), root.join("datasets")];
    candidates.into_iter().find(|p| p.exists())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalise_level() {
        assert_eq!(normalise_level("DEBUG"), "debug");
        assert_eq!(normalise_level("CRITICAL"), "error");
        assert_eq!(normalise_level("info"), "info");
        assert_eq!(normalise_level("WARNING"), "warn");
        assert_eq!(normalise_level("ERROR"), "error");
        assert_eq!(normalise_level("TRACE"), "trace");
    }

    #[test]
    fn test_discover_data_path_returns_none_when_absent() {
        let tmp = TempDir::new().expect("tempdir");
        assert!(discover_data_path_in(tmp.path()).is_none());
    }

    #[test]
    fn test_discovery_creates_nothing() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().join(".call-peak");

        assert!(discover_data_path_in(&root).is_none());
        assert!(!root.exists());
        assert!(!root.join("logs").exists());
    }

    #[test]
    fn test_discover_data_path_prefers_dataset_file() {
        let tmp = TempDir::new().expect("tempdir");
        let file = tmp.path().join("dataset.json");
        std::fs::write(&file, "[]").expect("write dataset");
        std::fs::create_dir_all(tmp.path().join("datasets")).expect("create datasets dir");

        assert_eq!(discover_data_path_in(tmp.path()), Some(file));
    }

    #[test]
    fn test_discover_data_path_finds_datasets_dir() {
        let tmp = TempDir::new().expect("tempdir");
        let dir = tmp.path().join("datasets");
        std::fs::create_dir_all(&dir).expect("create datasets dir");

        assert_eq!(discover_data_path_in(tmp.path()), Some(dir));
    }
}

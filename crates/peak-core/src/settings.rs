use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{PeakError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Peak concurrent call analysis per customer and day
#[derive(Parser, Debug, Clone)]
#[command(
    name = "call-peak",
    about = "Peak concurrent call analysis per customer and day",
    version
)]
pub struct Settings {
    /// Dataset file, or a directory of `.json` datasets
    #[arg(long, short, env = "CALL_PEAK_INPUT")]
    pub input: Option<PathBuf>,

    /// Where to write the results document (stdout when omitted)
    #[arg(long, short, env = "CALL_PEAK_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Analyse (customer, day) groups one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Logging level
    #[arg(
        long,
        default_value = "INFO",
        env = "CALL_PEAK_LOG_LEVEL",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Log file path (stderr when omitted)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments. Exits with clap's usage message on error.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Parse an explicit argument list, enabling unit-testing without
    /// spawning subprocesses.
    pub fn try_load_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let settings =
            Settings::try_parse_from(args).map_err(|e| PeakError::Config(e.to_string()))?;
        Ok(Self::resolve(settings))
    }

    /// `true` unless `--sequential` was given.
    pub fn parallel(&self) -> bool {
        !self.sequential
    }

    /// Apply the `--debug` override.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::try_load_from(["call-peak"]).unwrap();
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.parallel());
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
    }

    #[test]
    fn test_explicit_paths() {
        let settings = Settings::try_load_from([
            "call-peak",
            "--input",
            "/data/calls.json",
            "-o",
            "/tmp/out.json",
        ])
        .unwrap();
        assert_eq!(settings.input, Some(PathBuf::from("/data/calls.json")));
        assert_eq!(settings.output, Some(PathBuf::from("/tmp/out.json")));
    }

    #[test]
    fn test_sequential_flag() {
        let settings = Settings::try_load_from(["call-peak", "--sequential"]).unwrap();
        assert!(!settings.parallel());
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let settings =
            Settings::try_load_from(["call-peak", "--log-level", "ERROR", "--debug"]).unwrap();
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_invalid_log_level_is_config_error() {
        let err = Settings::try_load_from(["call-peak", "--log-level", "LOUD"]).unwrap_err();
        assert!(matches!(err, PeakError::Config(_)));
    }
}

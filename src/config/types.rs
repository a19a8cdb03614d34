//! Core configuration types.
//! - Config holds every runtime setting with sensible defaults.
//! - SyncConfig is the immutable subset the sync engine runs on.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{CUPS_HOST_DEFAULT, CUPS_PORT_DEFAULT, INTERVAL_MAX, POLL_INTERVAL_DEFAULT, QUIET_PERIOD_DEFAULT};
use crate::errors::SyncError;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Settings for the optional print-service diagnostics run at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSettings {
    /// Run the diagnostics at all
    pub enabled: bool,
    /// Printer the drop folder feeds; highlighted in the listing
    pub printer: Option<String>,
    /// Submit a test page to `printer`
    pub test_page: bool,
    pub host: String,
    pub port: u16,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            printer: None,
            test_page: false,
            host: CUPS_HOST_DEFAULT.to_string(),
            port: CUPS_PORT_DEFAULT,
        }
    }
}

/// Runtime configuration assembled from defaults, XML and CLI/env.
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder the producer drops files into
    pub source_dir: Option<PathBuf>,
    /// Folder settled files are moved into
    pub dest_dir: Option<PathBuf>,
    /// Optional destination filename prefix; empty disables renaming
    pub filename_prefix: String,
    /// Minimum age since last modification before a file is tracked
    pub quiet_period: Duration,
    /// Time between scan passes
    pub poll_interval: Duration,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    pub print: PrintSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: None,
            dest_dir: None,
            filename_prefix: String::new(),
            quiet_period: QUIET_PERIOD_DEFAULT,
            poll_interval: POLL_INTERVAL_DEFAULT,
            log_level: LogLevel::Normal,
            log_file: None,
            print: PrintSettings::default(),
        }
    }
}

impl Config {
    /// Construct a Config with explicit directories; other fields use defaults.
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: Some(source_dir.into()),
            dest_dir: Some(dest_dir.into()),
            ..Default::default()
        }
    }

    /// Extract the immutable engine settings. Fails if a required directory is unset.
    pub fn sync_config(&self) -> Result<SyncConfig, SyncError> {
        let source_dir = self.source_dir.clone().ok_or_else(|| {
            SyncError::Configuration("source directory is required (--source or SYNC_FROM)".into())
        })?;
        let dest_dir = self.dest_dir.clone().ok_or_else(|| {
            SyncError::Configuration("destination directory is required (--dest or SYNC_TO)".into())
        })?;
        if self.poll_interval.is_zero() {
            return Err(SyncError::Configuration("poll interval must be greater than zero".into()));
        }
        for (what, value) in [("poll interval", self.poll_interval), ("quiet period", self.quiet_period)] {
            if value > INTERVAL_MAX {
                return Err(SyncError::Configuration(format!(
                    "{what} of {}s exceeds the maximum of {}s",
                    value.as_secs(),
                    INTERVAL_MAX.as_secs()
                )));
            }
        }
        check_prefix(&self.filename_prefix)?;
        Ok(SyncConfig {
            source_dir,
            dest_dir,
            filename_prefix: self.filename_prefix.clone(),
            quiet_period: self.quiet_period,
            poll_interval: self.poll_interval,
        })
    }
}

/// A prefix becomes part of a single file name, so it must not name a path.
fn check_prefix(prefix: &str) -> Result<(), SyncError> {
    if prefix.contains(['/', '\\']) || matches!(prefix, "." | "..") {
        return Err(SyncError::Configuration(format!(
            "filename prefix '{prefix}' must not contain path separators or '..'"
        )));
    }
    Ok(())
}

/// Immutable per-run settings consumed by the scan pass and scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub filename_prefix: String,
    pub quiet_period: Duration,
    pub poll_interval: Duration,
}

impl SyncConfig {
    /// Settings with the default quiet period, poll interval and no prefix.
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            filename_prefix: String::new(),
            quiet_period: QUIET_PERIOD_DEFAULT,
            poll_interval: POLL_INTERVAL_DEFAULT,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_is_configuration_error() {
        let mut cfg = Config::default();
        cfg.dest_dir = Some(PathBuf::from("/out"));
        let err = cfg.sync_config().unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(err.to_string().contains("SYNC_FROM"));
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let mut cfg = Config::new("/in", "/out");
        cfg.poll_interval = Duration::ZERO;
        assert!(cfg.sync_config().is_err());
    }

    #[test]
    fn oversized_poll_interval_rejected() {
        let mut cfg = Config::new("/in", "/out");
        cfg.poll_interval = Duration::from_secs(u64::MAX);
        let err = cfg.sync_config().unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(err.to_string().contains("poll interval"));
    }

    #[test]
    fn oversized_quiet_period_rejected() {
        let mut cfg = Config::new("/in", "/out");
        cfg.quiet_period = INTERVAL_MAX + Duration::from_secs(1);
        assert!(cfg.sync_config().is_err());
        cfg.quiet_period = INTERVAL_MAX;
        assert!(cfg.sync_config().is_ok());
    }

    #[test]
    fn path_like_prefixes_rejected() {
        for bad in ["../esc", "a/b", "a\\b", "..", "."] {
            let mut cfg = Config::new("/in", "/out");
            cfg.filename_prefix = bad.into();
            let err = cfg.sync_config().unwrap_err();
            assert!(err.to_string().contains("path separators"), "{bad}: {err}");
        }
        let mut cfg = Config::new("/in", "/out");
        cfg.filename_prefix = "job..v2".into();
        assert!(cfg.sync_config().is_ok());
    }

    #[test]
    fn defaults_match_reference_timing() {
        let sc = Config::new("/in", "/out").sync_config().unwrap();
        assert_eq!(sc.quiet_period, Duration::from_secs(5));
        assert_eq!(sc.poll_interval, Duration::from_secs(2));
        assert!(sc.filename_prefix.is_empty());
    }
}

//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Every setting can also come from the environment (SYNC_FROM, SYNC_TO,
//!   PREFIX_WITH, PRINT_* and friends).
//! - Source and destination are optional here so that a missing value is
//!   reported as a configuration error (exit 1) rather than a usage error.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::convert::Infallible;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::types::{Config, LogLevel};

/// Move files that have finished being written from a drop folder into a destination folder.
/// CLI flags and environment variables override values from the XML config file.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Move settled files from a drop folder into a destination folder")]
pub struct Args {
    /// Folder to watch (non-recursive).
    #[arg(long = "source", short = 's', env = "SYNC_FROM", value_hint = ValueHint::DirPath)]
    pub source_dir: Option<PathBuf>,

    /// Folder settled files are moved into.
    #[arg(long = "dest", short = 'o', env = "SYNC_TO", value_hint = ValueHint::DirPath)]
    pub dest_dir: Option<PathBuf>,

    /// Prefix for destination names; when set, the original name is lower-cased and joined with '_'.
    #[arg(long = "prefix", short = 'p', env = "PREFIX_WITH")]
    pub prefix: Option<String>,

    /// Seconds a file must be left untouched before it is tracked.
    #[arg(long = "quiet-secs", env = "SYNC_QUIET_SECS", value_name = "SECS")]
    pub quiet_secs: Option<u64>,

    /// Seconds between scan passes.
    #[arg(long = "poll-secs", env = "SYNC_POLL_SECS", value_name = "SECS")]
    pub poll_secs: Option<u64>,

    /// XML config file (defaults to $FOLDER_SYNC_CONFIG, then the per-user config dir).
    #[arg(long = "config", short = 'c', value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print where folder_sync looks for its config file, then exit.
    #[arg(long)]
    pub print_config: bool,

    /// Enable debug logging (shorthand for --log-level debug).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Set log level: quiet, normal, info, debug.
    #[arg(long, env = "SYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, env = "SYNC_LOG_FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,

    /// Run print-server diagnostics at startup.
    #[arg(long, env = "PRINT_LOCALLY", value_parser = parse_switch)]
    pub print_locally: bool,

    /// Printer the destination folder feeds (highlighted in diagnostics, target of the test page).
    #[arg(long, env = "PRINT_TO_PRINTER")]
    pub printer: Option<String>,

    /// Submit a test page to --printer at startup.
    #[arg(long, env = "PRINT_TEST_PAGE", value_parser = parse_switch)]
    pub print_test_page: bool,

    /// Print server host.
    #[arg(long, env = "CUPS_HOST")]
    pub cups_host: Option<String>,

    /// Print server port.
    #[arg(long, env = "CUPS_PORT")]
    pub cups_port: Option<u16>,
}

/// Lenient on/off switch for environment values: yes, true, on and 1 enable it,
/// anything else (including typos) leaves it off.
fn parse_switch(s: &str) -> Result<bool, Infallible> {
    Ok(matches!(s.trim().to_ascii_lowercase().as_str(), "yes" | "y" | "true" | "on" | "1"))
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI/env overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(p) = &self.source_dir {
            cfg.source_dir = Some(p.clone());
        }
        if let Some(p) = &self.dest_dir {
            cfg.dest_dir = Some(p.clone());
        }
        if let Some(prefix) = &self.prefix {
            cfg.filename_prefix = prefix.clone();
        }
        if let Some(secs) = self.quiet_secs {
            cfg.quiet_period = Duration::from_secs(secs);
        }
        if let Some(secs) = self.poll_secs {
            cfg.poll_interval = Duration::from_secs(secs);
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = Some(p.clone());
        }
        if self.print_locally {
            cfg.print.enabled = true;
        }
        if let Some(p) = &self.printer {
            cfg.print.printer = Some(p.clone());
        }
        if self.print_test_page {
            cfg.print.test_page = true;
        }
        if let Some(h) = &self.cups_host {
            cfg.print.host = h.clone();
        }
        if let Some(port) = self.cups_port {
            cfg.print.port = port;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

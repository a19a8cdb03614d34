//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor, resolve_config_path};
pub use types::{Config, LogLevel, PrintSettings, SyncConfig};
pub use validate::validate_dirs;
pub use xml::{load_config_from_xml_path, load_config_layer};

/// Defaults shared across submodules.
pub const QUIET_PERIOD_DEFAULT: std::time::Duration = std::time::Duration::from_secs(5);
pub const POLL_INTERVAL_DEFAULT: std::time::Duration = std::time::Duration::from_secs(2);
/// Upper bound for the poll interval and quiet period (one week).
pub const INTERVAL_MAX: std::time::Duration = std::time::Duration::from_secs(7 * 24 * 60 * 60);
pub const CUPS_HOST_DEFAULT: &str = "localhost";
pub const CUPS_PORT_DEFAULT: u16 = 631;

/// Environment variable naming an explicit XML config file.
pub const CONFIG_ENV: &str = "FOLDER_SYNC_CONFIG";

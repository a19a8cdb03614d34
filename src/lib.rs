//! Core library for `folder_sync`.
//!
//! Watches a source folder, waits until each file has stopped changing, then
//! moves it (optionally renamed) into a destination folder. The polling
//! engine lives in [`engine`]; everything else is configuration and glue.

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod output;
pub mod platform;
pub mod print;
pub mod shutdown;

pub use config::{
    Config, LogLevel, PrintSettings, SyncConfig, default_config_path, load_config_from_xml_path,
    load_config_layer, path_has_symlink_ancestor, validate_dirs,
};
pub use engine::{
    Observation, PassReport, Scheduler, StabilityTracker, destination_name, run_pass,
    run_until_shutdown, transfer,
};
pub use errors::{SyncError, TransferStep};
pub use shutdown::ShutdownToken;

/// Convenience prelude for embedding the engine.
pub mod prelude {
    pub use crate::config::{Config, SyncConfig};
    pub use crate::engine::{Scheduler, StabilityTracker, run_pass, run_until_shutdown};
    pub use crate::errors::SyncError;
    pub use crate::shutdown::ShutdownToken;
}

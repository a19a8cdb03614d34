//! Directory validation run once before the scheduler starts.
//! Verifies the source is a readable directory, creates the destination if
//! missing, and rejects a source and destination that resolve to the same place.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::types::SyncConfig;
use crate::errors::SyncError;

/// Validate and canonicalize the directories in `cfg` (in place).
pub fn validate_dirs(cfg: &mut SyncConfig) -> Result<(), SyncError> {
    ensure_dir_exists_and_is_dir(&cfg.source_dir, "source")?;
    ensure_readable(&cfg.source_dir, "source")?;
    ensure_dir_is_or_create(&cfg.dest_dir, "destination")?;

    let src_real = dunce::canonicalize(&cfg.source_dir).unwrap_or_else(|_| cfg.source_dir.clone());
    let dst_real = dunce::canonicalize(&cfg.dest_dir).unwrap_or_else(|_| cfg.dest_dir.clone());
    if src_real == dst_real {
        return Err(SyncError::Configuration(format!(
            "source and destination resolve to the same path: '{}'",
            src_real.display()
        )));
    }

    cfg.source_dir = src_real;
    cfg.dest_dir = dst_real;
    info!(
        source = %cfg.source_dir.display(),
        dest = %cfg.dest_dir.display(),
        prefix = %cfg.filename_prefix,
        quiet_secs = cfg.quiet_period.as_secs_f64(),
        poll_secs = cfg.poll_interval.as_secs_f64(),
        "Config validated"
    );
    Ok(())
}

fn ensure_dir_exists_and_is_dir(path: &Path, name: &str) -> Result<(), SyncError> {
    if !path.exists() {
        return Err(SyncError::Configuration(format!("{name} does not exist: {}", path.display())));
    }
    if !path.is_dir() {
        return Err(SyncError::Configuration(format!("{name} is not a directory: {}", path.display())));
    }
    Ok(())
}

fn ensure_readable(path: &Path, name: &str) -> Result<(), SyncError> {
    fs::read_dir(path).map_err(|e| {
        SyncError::Configuration(format!(
            "cannot read {name} directory '{}': {e}; check permissions",
            path.display()
        ))
    })?;
    debug!("{name} readable: {}", path.display());
    Ok(())
}

fn ensure_dir_is_or_create(path: &Path, name: &str) -> Result<(), SyncError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(SyncError::Configuration(format!(
                "{name} exists but isn't a directory: {}",
                path.display()
            )));
        }
    } else {
        fs::create_dir_all(path).map_err(|e| {
            SyncError::Configuration(format!("failed to create {name} directory '{}': {e}", path.display()))
        })?;
        info!("Created {name} directory: {}", path.display());
    }
    Ok(())
}

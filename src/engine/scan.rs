//! One scan pass over the source directory.
//!
//! Each entry is classified in listing order:
//! directory -> skip, hidden -> skip, younger than the quiet period -> skip
//! (the tracker is not touched), otherwise the tracker decides whether the
//! file is settled. Settled files are handed to the transfer engine.
//!
//! The first error aborts the pass; the remaining entries wait for the next one.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

use super::tracker::{Observation, StabilityTracker};
use super::transfer::transfer;
use crate::config::SyncConfig;
use crate::errors::SyncError;

/// How an entry was handled during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryClass {
    Directory,
    Hidden,
    TooRecent,
    Observed(Observation),
}

/// Summary of a completed pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Destination paths written this pass, in listing order
    pub transferred: Vec<PathBuf>,
    /// Entries seen for the first time (now tracked)
    pub newly_tracked: usize,
    /// Tracked entries whose size changed
    pub unstable: usize,
    /// Entries skipped for being too recently modified
    pub too_recent: usize,
    /// Hidden entries and directories
    pub ignored: usize,
    /// Tracker entries dropped because their file vanished
    pub pruned: usize,
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// Time since `modified`; a timestamp in the future counts as zero age.
fn age_of(modified: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(modified).unwrap_or(Duration::ZERO)
}

/// Run one pass at wall-clock time `now`.
pub fn run_pass(
    cfg: &SyncConfig,
    tracker: &mut StabilityTracker,
    now: SystemTime,
) -> Result<PassReport, SyncError> {
    let dir_err = |source| SyncError::DirectoryRead {
        path: cfg.source_dir.clone(),
        source,
    };
    let entries = fs::read_dir(&cfg.source_dir).map_err(dir_err)?;

    let mut report = PassReport::default();
    let mut listed: HashSet<PathBuf> = HashSet::new();

    for entry in entries {
        let entry = entry.map_err(dir_err)?;
        let path = entry.path();
        let class = classify_entry(cfg, tracker, &entry, &path, now)?;

        match class {
            EntryClass::Directory | EntryClass::Hidden => report.ignored += 1,
            EntryClass::TooRecent => {
                report.too_recent += 1;
                listed.insert(path);
            }
            EntryClass::Observed(Observation::NotReady) => {
                report.newly_tracked += 1;
                listed.insert(path);
            }
            EntryClass::Observed(Observation::Unstable { .. }) => {
                report.unstable += 1;
                listed.insert(path);
            }
            EntryClass::Observed(Observation::Ready) => {
                let dest = transfer(&path, &cfg.dest_dir, &cfg.filename_prefix)?;
                tracker.forget(&path);
                report.transferred.push(dest);
            }
        }
    }

    report.pruned = tracker.retain_present(&listed);
    if report.pruned > 0 {
        debug!(pruned = report.pruned, "Dropped tracker entries for vanished files");
    }
    Ok(report)
}

fn classify_entry(
    cfg: &SyncConfig,
    tracker: &mut StabilityTracker,
    entry: &fs::DirEntry,
    path: &Path,
    now: SystemTime,
) -> Result<EntryClass, SyncError> {
    let name = entry.file_name();
    let stat_err = |source| SyncError::Stat {
        path: path.to_path_buf(),
        source,
    };

    if entry.file_type().map_err(stat_err)?.is_dir() {
        debug!(name = %name.to_string_lossy(), "Directory, ignoring");
        return Ok(EntryClass::Directory);
    }
    if is_hidden(&name) {
        return Ok(EntryClass::Hidden);
    }

    let meta = fs::metadata(path).map_err(stat_err)?;
    // A symlink may point at a directory.
    if meta.is_dir() {
        debug!(name = %name.to_string_lossy(), "Link to a directory, ignoring");
        return Ok(EntryClass::Directory);
    }
    let modified = meta.modified().map_err(stat_err)?;
    let age = age_of(modified, now);
    let size = meta.len();

    if age < cfg.quiet_period {
        debug!(
            name = %name.to_string_lossy(),
            age_ms = age.as_millis() as u64,
            "Modified too recently, ignoring this pass"
        );
        return Ok(EntryClass::TooRecent);
    }

    let observation = tracker.observe(path, size);
    match observation {
        Observation::NotReady => {
            debug!(name = %name.to_string_lossy(), size, "Not yet tracked; waiting for next pass")
        }
        Observation::Unstable { previous } => {
            debug!(name = %name.to_string_lossy(), stored = previous, observed = size, "Size changed; waiting")
        }
        Observation::Ready => {
            debug!(name = %name.to_string_lossy(), size, "Size stable; transferring")
        }
    }
    Ok(EntryClass::Observed(observation))
}

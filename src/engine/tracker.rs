//! Stability tracker.
//!
//! Remembers the size last observed for each candidate path. A file is ready
//! once two consecutive eligible observations report the same size.
//!
//! The tracker is a plain owned value: the scheduler owns one and lends it
//! mutably to each scan pass, so it needs no locking.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Outcome of observing a path with its current size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First sighting; size recorded, wait for the next pass.
    NotReady,
    /// Size differs from the stored one; stored size replaced.
    Unstable { previous: u64 },
    /// Same size as last time; caller should transfer and then `forget`.
    Ready,
}

#[derive(Debug, Default)]
pub struct StabilityTracker {
    sizes: HashMap<PathBuf, u64>,
}

impl StabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `size` for `path` and classify it.
    ///
    /// A `Ready` observation leaves the entry in place; it is removed only
    /// after the transfer succeeded.
    pub fn observe(&mut self, path: &Path, size: u64) -> Observation {
        match self.sizes.get_mut(path) {
            None => {
                self.sizes.insert(path.to_path_buf(), size);
                Observation::NotReady
            }
            Some(stored) if *stored == size => Observation::Ready,
            Some(stored) => {
                let previous = *stored;
                *stored = size;
                Observation::Unstable { previous }
            }
        }
    }

    /// Drop the entry for `path` (after a successful transfer).
    pub fn forget(&mut self, path: &Path) -> bool {
        self.sizes.remove(path).is_some()
    }

    /// Drop every entry whose path is not in `present`.
    /// Returns the number of entries removed.
    pub fn retain_present(&mut self, present: &HashSet<PathBuf>) -> usize {
        let before = self.sizes.len();
        self.sizes.retain(|p, _| present.contains(p));
        before - self.sizes.len()
    }

    /// Stored size for `path`, if tracked.
    pub fn size_of(&self, path: &Path) -> Option<u64> {
        self.sizes.get(path).copied()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.sizes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

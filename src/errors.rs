//! Typed error definitions for folder_sync.
//! Every failure the sync core can hit maps to one of four kinds; all of them are fatal.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::engine::hints::io_hint;

/// Step of a transfer that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    /// Reading the source file into memory
    Read,
    /// Writing the destination file
    Write,
    /// Removing the source after a successful write
    Remove,
}

impl fmt::Display for TransferStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransferStep::Read => "read",
            TransferStep::Write => "write",
            TransferStep::Remove => "remove",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot read source directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Transfer failed during {step} of {path}: {source}")]
    Transfer {
        step: TransferStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    /// Short machine-friendly kind for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Configuration(_) => "configuration",
            SyncError::DirectoryRead { .. } => "directory_read",
            SyncError::Stat { .. } => "stat",
            SyncError::Transfer { .. } => "transfer",
        }
    }

    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            SyncError::Configuration(_) => 10,
            SyncError::DirectoryRead { .. } => 20,
            SyncError::Stat { .. } => 30,
            SyncError::Transfer { step, .. } => match step {
                TransferStep::Read => 40,
                TransferStep::Write => 41,
                TransferStep::Remove => 42,
            },
        }
    }

    /// Actionable hint derived from the underlying OS error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SyncError::Configuration(_) => None,
            SyncError::DirectoryRead { source, .. }
            | SyncError::Stat { source, .. }
            | SyncError::Transfer { source, .. } => io_hint(source),
        }
    }
}

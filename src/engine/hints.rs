//! OS error hints.
//!
//! Maps raw OS error codes (or, failing that, the error kind) to a short
//! actionable hint that is attached to error log lines.

use std::io;

/// Hint for an I/O error, if one is known.
pub fn io_hint(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            let hint = match code {
                libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
                libc::ENOENT => Some("path not found; it may have been removed by another process"),
                libc::EBUSY => Some("resource busy; ensure no other process is writing"),
                libc::ENOSPC => Some("insufficient space on device"),
                libc::EROFS => Some("read-only filesystem; cannot write here"),
                libc::EISDIR => Some("path is a directory"),
                libc::ENAMETOOLONG => Some("filename or path too long; shorten the prefix or name"),
                libc::EMFILE => Some("process file descriptor limit reached"),
                libc::ENFILE => Some("system-wide file table overflow"),
                libc::ELOOP => Some("too many symbolic link levels; possible symlink cycle"),
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
        #[cfg(windows)]
        {
            let hint = match code {
                5 => Some("access denied; check permissions"),
                32 => Some("sharing violation; file is in use"),
                2 | 3 => Some("path not found"),
                112 => Some("insufficient disk space"),
                _ => None,
            };
            if hint.is_some() {
                return hint;
            }
        }
        let _ = code;
    }

    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; it may have been removed by another process"),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Some("busy/timed out"),
        _ => None,
    }
}

//! Windows implementations of platform helpers (no POSIX modes; best-effort).

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Open (create or truncate) a destination file for writing.
pub fn open_output_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create(true).truncate(true).open(path)
}

/// Windows has no mode bits to fix; clear a read-only flag left on an overwritten file.
pub fn apply_output_mode(path: &Path) -> io::Result<()> {
    let mut perms = std::fs::metadata(path)?.permissions();
    if perms.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        std::fs::set_permissions(path, perms)?;
    }
    Ok(())
}

/// Open log file for appending.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

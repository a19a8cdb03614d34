//! Transfer engine: copy a settled file into the destination, then delete the source.
//!
//! Ordering is copy-then-delete. A failed write leaves the source untouched; a
//! failed delete leaves both copies in place. Nothing is retried here.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{SyncError, TransferStep};
use crate::platform::{apply_output_mode, open_output_file};

/// Separator placed between the prefix and the lower-cased original name.
pub const PREFIX_SEPARATOR: &str = "_";

/// Destination file name for `original` under `prefix`.
///
/// - empty prefix: the original name, unmodified
/// - otherwise: `<prefix>_<lower-cased original>`
pub fn destination_name(original: &OsStr, prefix: &str) -> OsString {
    if prefix.is_empty() {
        return original.to_owned();
    }
    let lowered = match original.to_str() {
        Some(s) => s.to_lowercase(),
        None => original.to_string_lossy().to_lowercase(),
    };
    let mut name = OsString::with_capacity(prefix.len() + PREFIX_SEPARATOR.len() + lowered.len());
    name.push(prefix);
    name.push(PREFIX_SEPARATOR);
    name.push(lowered);
    name
}

/// Move `src` into `dest_dir`, renaming per `prefix`. Returns the destination path.
pub fn transfer(src: &Path, dest_dir: &Path, prefix: &str) -> Result<PathBuf, SyncError> {
    let file_name = src.file_name().ok_or_else(|| SyncError::Transfer {
        step: TransferStep::Read,
        path: src.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "source has no file name"),
    })?;
    let name = destination_name(file_name, prefix);
    if !is_single_component(&name) {
        return Err(SyncError::Transfer {
            step: TransferStep::Write,
            path: dest_dir.join(&name),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "destination name would leave the destination directory",
            ),
        });
    }
    let dest = dest_dir.join(name);

    let bytes = fs::read(src).map_err(|source| SyncError::Transfer {
        step: TransferStep::Read,
        path: src.to_path_buf(),
        source,
    })?;
    debug!(src = %src.display(), bytes = bytes.len(), "Read source into memory");

    write_destination(&dest, &bytes).map_err(|source| SyncError::Transfer {
        step: TransferStep::Write,
        path: dest.clone(),
        source,
    })?;
    debug!(dest = %dest.display(), "Destination written and flushed");

    fs::remove_file(src).map_err(|source| SyncError::Transfer {
        step: TransferStep::Remove,
        path: src.to_path_buf(),
        source,
    })?;

    info!(src = %src.display(), dest = %dest.display(), bytes = bytes.len(), "Transferred file");
    Ok(dest)
}

fn is_single_component(name: &OsStr) -> bool {
    let mut parts = Path::new(name).components();
    matches!((parts.next(), parts.next()), (Some(Component::Normal(_)), None))
}

fn write_destination(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut f = open_output_file(dest)?;
    f.write_all(bytes)?;
    f.sync_all()?;
    drop(f);
    apply_output_mode(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_prefix_keeps_name_verbatim() {
        assert_eq!(destination_name(OsStr::new("Report.PDF"), ""), OsString::from("Report.PDF"));
    }

    #[test]
    fn prefix_lowercases_and_joins() {
        assert_eq!(destination_name(OsStr::new("Report.PDF"), "out"), OsString::from("out_report.pdf"));
    }

    #[test]
    fn transfer_moves_bytes_and_removes_source() {
        let td = tempdir().unwrap();
        let src_dir = td.path().join("in");
        let dst_dir = td.path().join("out");
        fs::create_dir_all(&src_dir).unwrap();
        fs::create_dir_all(&dst_dir).unwrap();
        let src = src_dir.join("A.txt");
        fs::write(&src, b"payload").unwrap();

        let dest = transfer(&src, &dst_dir, "job").unwrap();
        assert_eq!(dest, dst_dir.join("job_a.txt"));
        assert_eq!(fs::read(&dest).unwrap(), b"payload");
        assert!(!src.exists());
    }

    #[test]
    fn prefix_with_parent_dir_never_writes_outside_dest() {
        let td = tempdir().unwrap();
        let spool = td.path().join("spool");
        fs::create_dir_all(&spool).unwrap();
        let src = td.path().join("a.txt");
        fs::write(&src, b"x").unwrap();

        let err = transfer(&src, &spool, "../esc").unwrap_err();
        assert!(matches!(err, SyncError::Transfer { step: TransferStep::Write, .. }), "{err:?}");
        assert!(!td.path().join("esc_a.txt").exists());
        assert!(src.exists());
    }

    #[test]
    fn write_failure_leaves_source_in_place() {
        let td = tempdir().unwrap();
        let src = td.path().join("keep.txt");
        fs::write(&src, b"x").unwrap();
        let missing = td.path().join("no_such_dir");

        let err = transfer(&src, &missing, "").unwrap_err();
        assert!(matches!(err, SyncError::Transfer { step: TransferStep::Write, .. }), "{err:?}");
        assert!(src.exists());
    }
}

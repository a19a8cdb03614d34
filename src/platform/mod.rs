//! Platform-specific helpers.
//! Hides OS differences (Unix/Windows) behind a uniform API so the engine and
//! logging code stay platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{apply_output_mode, open_log_file_secure_append, open_output_file, OUTPUT_FILE_MODE};

#[cfg(not(unix))]
pub use windows::{apply_output_mode, open_log_file_secure_append, open_output_file};

//! Tracing initialization.
//! Builds a subscriber with an EnvFilter, compact or JSON stdout output, and optional file logging.
//!
//! Behavior:
//! - Log level is driven by LogLevel (no RUST_LOG override here).
//! - If `log_file` is provided and passes safety checks, a non-blocking file layer is added.
//! - File logging is refused if any ancestor of the file path is a symlink.

use anyhow::Result;
use chrono::Local;
use folder_sync::output as out;
use folder_sync::path_has_symlink_ancestor;
use folder_sync::platform::open_log_file_secure_append;
use folder_sync::LogLevel;
use std::fmt as stdfmt;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

#[inline]
fn to_level_filter(lvl: &LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Formatting layer writing to stdout, or to `writer` when given.
fn fmt_layer<S>(json: bool, writer: Option<NonBlocking>) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let base = tsfmt::layer().with_thread_names(true);
    if json {
        let layer = base
            .json()
            .with_timer(LocalHumanTime)
            .with_level(true)
            .with_target(true);
        match writer {
            Some(w) => layer.with_writer(w).boxed(),
            None => layer.boxed(),
        }
    } else {
        let layer = base
            .compact()
            .with_timer(LocalHumanTime)
            .with_level(true)
            .with_target(true);
        match writer {
            Some(w) => layer.with_ansi(false).with_writer(w).boxed(),
            None => layer.boxed(),
        }
    }
}

/// Try to open a non-blocking file writer for logging. Prints the reason and
/// returns None when file logging cannot be enabled.
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            eprintln!(
                "Refusing to enable file logging: ancestor of {} is a symlink; proceeding without file logging.",
                path.display()
            );
            return None;
        }
        Err(e) => {
            eprintln!(
                "Error checking log path {} for symlinks: {}; proceeding without file logging.",
                path.display(),
                e
            );
            return None;
        }
        Ok(false) => {}
    }

    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            None
        }
    }
}

/// Initialize tracing. Returns a WorkerGuard when a file layer is active; it
/// must be held until shutdown so buffered lines are flushed.
pub fn init_tracing(lvl: &LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::default().add_directive(to_level_filter(lvl).into());

    let mut guard = None;
    let mut file_layer = None;
    if let Some(path) = log_file {
        match maybe_open_non_blocking_writer(path) {
            Some((writer, g)) => {
                file_layer = Some(fmt_layer(json, Some(writer)));
                guard = Some(g);
            }
            None => out::print_warn(&format!(
                "Requested file logging to '{}' was not enabled. Check that the parent directory is writable and that no ancestor is a symlink. Logs will continue to stdout.",
                path.display()
            )),
        }
    }

    registry()
        .with(filter)
        .with(fmt_layer(json, None))
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}

//! Scheduler and lifecycle controller.
//!
//! A single worker thread owns the tracker and runs scan passes on a fixed
//! interval; passes never overlap. The foreground thread blocks on the
//! shutdown token. Cancellation is observed only between passes.
//!
//! Late ticks are coalesced: if a pass overruns its slot, at most one pass
//! follows immediately and the cadence restarts from there.

use std::thread;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, error, info};

use super::scan::run_pass;
use super::tracker::StabilityTracker;
use crate::config::SyncConfig;
use crate::errors::SyncError;
use crate::shutdown::ShutdownToken;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// Next deadline after a pass that was due at `due` and finished at `now`.
/// None if the interval cannot be represented as an `Instant`.
pub fn next_deadline(due: Instant, interval: Duration, now: Instant) -> Option<Instant> {
    let next = due.checked_add(interval)?;
    Some(if next < now { now } else { next })
}

fn interval_overflow(interval: Duration) -> SyncError {
    SyncError::Configuration(format!("poll interval of {}s is too large", interval.as_secs()))
}

#[derive(Debug)]
pub struct Scheduler {
    cfg: SyncConfig,
    tracker: StabilityTracker,
    token: ShutdownToken,
    state: SchedulerState,
    passes: u64,
}

impl Scheduler {
    pub fn new(cfg: SyncConfig, token: ShutdownToken) -> Self {
        Self {
            cfg,
            tracker: StabilityTracker::new(),
            token,
            state: SchedulerState::Running,
            passes: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of completed passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn tracker(&self) -> &StabilityTracker {
        &self.tracker
    }

    /// Run passes until the token is cancelled (Ok) or a pass fails (Err).
    pub fn run(&mut self) -> Result<(), SyncError> {
        let interval = self.cfg.poll_interval;
        let Some(mut due) = Instant::now().checked_add(interval) else {
            self.state = SchedulerState::Stopped;
            return Err(interval_overflow(interval));
        };
        info!(
            source = %self.cfg.source_dir.display(),
            dest = %self.cfg.dest_dir.display(),
            interval_ms = interval.as_millis() as u64,
            "Scheduler running"
        );

        loop {
            if self.token.wait_until(due) {
                self.state = SchedulerState::Stopped;
                info!(passes = self.passes, "Scheduler stopped");
                return Ok(());
            }

            debug!(pass = self.passes + 1, "Syncing folders");
            match run_pass(&self.cfg, &mut self.tracker, SystemTime::now()) {
                Ok(report) => {
                    self.passes += 1;
                    debug!(
                        transferred = report.transferred.len(),
                        new = report.newly_tracked,
                        unstable = report.unstable,
                        too_recent = report.too_recent,
                        tracked = self.tracker.len(),
                        "Pass complete"
                    );
                }
                Err(e) => {
                    self.state = SchedulerState::Stopped;
                    error!(
                        code = e.code(),
                        kind = e.kind(),
                        hint = e.hint().unwrap_or(""),
                        error = %e,
                        "Pass failed; stopping"
                    );
                    return Err(e);
                }
            }

            due = match next_deadline(due, interval, Instant::now()) {
                Some(next) => next,
                None => {
                    self.state = SchedulerState::Stopped;
                    return Err(interval_overflow(interval));
                }
            };
        }
    }
}

/// Run the scheduler on a worker thread until `token` is cancelled or a pass fails.
///
/// The calling thread only waits on the token. A failing pass cancels the
/// token itself so the caller wakes up and the error is returned.
pub fn run_until_shutdown(cfg: SyncConfig, token: ShutdownToken) -> Result<(), SyncError> {
    let worker_token = token.clone();
    let handle = thread::Builder::new()
        .name("scan-scheduler".into())
        .spawn(move || {
            let mut scheduler = Scheduler::new(cfg, worker_token.clone());
            let result = scheduler.run();
            if result.is_err() {
                worker_token.cancel();
            }
            result
        })
        .map_err(|e| SyncError::Configuration(format!("failed to spawn scheduler thread: {e}")))?;

    token.wait();
    debug!("Shutdown observed; waiting for the current pass to finish");
    match handle.join() {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

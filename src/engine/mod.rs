//! Polling sync engine: stability tracking, scan passes, transfers and scheduling.

pub mod hints;
pub mod scan;
pub mod scheduler;
pub mod tracker;
pub mod transfer;

pub use scan::{EntryClass, PassReport, run_pass};
pub use scheduler::{Scheduler, SchedulerState, next_deadline, run_until_shutdown};
pub use tracker::{Observation, StabilityTracker};
pub use transfer::{PREFIX_SEPARATOR, destination_name, transfer};

//! Cooperative shutdown coordination.
//!
//! A `ShutdownToken` is shared between the signal handler, the foreground
//! thread and the scheduler worker. Cancelling it is one-way and idempotent;
//! waiters blocked in `wait`/`wait_timeout` wake immediately.
//!
//! Notes:
//! - Clones share state.
//! - Poisoned locks are recovered: the guarded value is a plain bool.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    cond: Condvar,
}

#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<Inner>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner.cancelled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request a cooperative shutdown (idempotent).
    pub fn cancel(&self) {
        let mut cancelled = self.lock();
        *cancelled = true;
        self.inner.cond.notify_all();
    }

    /// Check whether a shutdown has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    /// Block until cancelled.
    pub fn wait(&self) {
        let guard = self.lock();
        let _guard = self
            .inner
            .cond
            .wait_while(guard, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Block until cancelled or `deadline` passes. Returns true if cancelled.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut guard = self.lock();
        loop {
            if *guard {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (g, _) = self
                .inner
                .cond
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            guard = g;
        }
    }

    /// Block for at most `timeout`. Returns true if cancelled.
    /// A timeout too large for an `Instant` waits for cancellation alone.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait_until(deadline),
            None => {
                self.wait();
                true
            }
        }
    }
}

//! Maintenance Scheduler
//!
//! Timer task that periodically marks a prune as due.
//!
//! The task never touches the cache. It sleeps for the interval, raises a flag
//! and waits to be rearmed; the cache observes the flag on its next operation,
//! rearms the timer and prunes in its own call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{CacheError, Result};

/// Owns the prune timer of one cache.
///
/// Dropping the scheduler aborts its task.
#[derive(Debug)]
pub struct MaintenanceScheduler {
    /// Raised by the timer, cleared by [`MaintenanceScheduler::take_due`]
    due: Arc<AtomicBool>,
    /// Restarts the timer after a due tick has been consumed
    rearm: Arc<Notify>,
    handle: JoinHandle<()>,
    interval: Duration,
}

impl MaintenanceScheduler {
    /// Spawns the timer task on the current tokio runtime.
    ///
    /// # Arguments
    /// * `interval_ms` - Delay between the timer being armed and the prune becoming due
    ///
    /// # Errors
    /// Returns `CacheError::NoRuntime` when called outside a tokio runtime.
    ///
    /// # Example
    /// ```ignore
    /// let scheduler = MaintenanceScheduler::start(1000)?;
    /// // On every cache operation:
    /// if scheduler.take_due() {
    ///     store.prune_expired();
    /// }
    /// ```
    pub fn start(interval_ms: u64) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| CacheError::NoRuntime(e.to_string()))?;

        let interval = Duration::from_millis(interval_ms);
        let due = Arc::new(AtomicBool::new(false));
        let rearm = Arc::new(Notify::new());
        let handle = runtime.spawn(run_timer(interval, due.clone(), rearm.clone()));

        info!(
            "Starting maintenance scheduler with interval of {} ms",
            interval_ms
        );

        Ok(Self {
            due,
            rearm,
            handle,
            interval,
        })
    }

    // == Take Due ==
    /// Consumes a pending tick.
    ///
    /// Returns true if a prune is due, in which case the flag is cleared and
    /// the timer is rearmed for the next interval.
    pub fn take_due(&self) -> bool {
        if self.due.swap(false, Ordering::AcqRel) {
            self.rearm.notify_one();
            true
        } else {
            false
        }
    }

    /// Checks for a pending tick without consuming it.
    pub fn is_due(&self) -> bool {
        self.due.load(Ordering::Acquire)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    // == Stop ==
    /// Cancels future ticks. A tick that is already pending stays pending.
    pub fn stop(&self) {
        self.handle.abort();
        debug!("Maintenance scheduler stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for MaintenanceScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_timer(interval: Duration, due: Arc<AtomicBool>, rearm: Arc<Notify>) {
    loop {
        tokio::time::sleep(interval).await;
        due.store(true, Ordering::Release);
        debug!("Maintenance tick: prune due");

        // Wait until the tick has been consumed before arming again
        rearm.notified().await;
    }
}

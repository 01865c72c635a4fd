//! Timer port and its tokio implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

/// Callback run on every timer fire.
pub type TickFn = Arc<dyn Fn() + Send + Sync>;

/// Identifies one scheduled repeating callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub(crate) u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Repeating timer facility.
pub trait Timer: Send + Sync {
    /// Runs `task` every `every`, first fire one period from now.
    fn schedule(&self, every: Duration, task: TickFn) -> TimerHandle;

    /// Stops a scheduled callback. Unknown handles are ignored.
    fn cancel(&self, handle: TimerHandle);

    /// Number of callbacks currently scheduled.
    fn active_count(&self) -> usize;
}

/// Timer backed by tokio tasks.
pub struct TokioTimer {
    /// Runtime the timer tasks are spawned on.
    runtime: Handle,
    /// Next handle id.
    next_id: AtomicU64,
    /// Running timer tasks.
    tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
}

impl TokioTimer {
    /// Creates a timer spawning onto `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a timer on the runtime of the calling context.
    ///
    /// # Errors
    /// Returns an error when called outside a tokio runtime.
    pub fn try_current() -> Result<Self, tokio::runtime::TryCurrentError> {
        Ok(Self::new(Handle::try_current()?))
    }

    fn tasks(&self) -> std::sync::MutexGuard<'_, HashMap<u64, JoinHandle<()>>> {
        // A poisoned map is still consistent: entries are only inserted or removed.
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Timer for TokioTimer {
    fn schedule(&self, every: Duration, task: TickFn) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let join = self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                task();
            }
        });

        self.tasks().insert(id, join);
        debug!(handle = id, every_secs = every.as_secs(), "Timer scheduled");
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(join) = self.tasks().remove(&handle.0) {
            join.abort();
            debug!(handle = handle.0, "Timer cancelled");
        }
    }

    fn active_count(&self) -> usize {
        self.tasks().len()
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        for (_, join) in self.tasks().drain() {
            join.abort();
        }
    }
}

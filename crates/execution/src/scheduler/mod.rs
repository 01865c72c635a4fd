//! Polling scheduler for price ticks.
//!
//! Owns the cadence of the tracker:
//! - A configurable interval in whole minutes
//! - A live mode with a fixed one-minute cadence that overrides the interval
//!
//! Exactly one timer handle is live at a time; switching cadence cancels the
//! old handle before installing the new one.

mod timer;

pub use timer::{TickFn, Timer, TimerHandle, TokioTimer};

use il_tracker_domain::enums::TrackingMode;
use il_tracker_domain::value_objects::PollInterval;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

/// Scheduler errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Interval below one minute.
    #[error("poll interval must be at least one minute, got {0}")]
    InvalidInterval(u32),
}

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerStatus {
    /// No timer installed.
    Idle,
    /// A timer is installed and ticks will fire.
    Scheduled,
}

/// Cadence settings shared by the whole tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingState {
    /// Configured poll interval.
    pub poll_interval: PollInterval,
    /// Whether live mode overrides the interval.
    pub live_mode_enabled: bool,
}

impl TrackingState {
    /// Cadence currently in effect.
    pub fn effective_interval(&self) -> PollInterval {
        if self.live_mode_enabled {
            PollInterval::ONE_MINUTE
        } else {
            self.poll_interval
        }
    }

    /// Mode matching the live flag.
    pub fn mode(&self) -> TrackingMode {
        if self.live_mode_enabled {
            TrackingMode::Live
        } else {
            TrackingMode::Interval
        }
    }
}

struct SchedulerInner {
    /// Cadence settings.
    state: TrackingState,
    /// Installed timer, if any.
    handle: Option<TimerHandle>,
}

/// Drives the tick callback on the configured cadence.
pub struct PollingScheduler {
    /// Timer facility.
    timer: Arc<dyn Timer>,
    /// Callback fired on each tick.
    tick: TickFn,
    /// Cadence and installed handle.
    inner: Mutex<SchedulerInner>,
}

impl PollingScheduler {
    /// Creates an idle scheduler.
    pub fn new(timer: Arc<dyn Timer>, tick: TickFn, poll_interval: PollInterval) -> Self {
        Self {
            timer,
            tick,
            inner: Mutex::new(SchedulerInner {
                state: TrackingState {
                    poll_interval,
                    live_mode_enabled: false,
                },
                handle: None,
            }),
        }
    }

    fn inner(&self) -> MutexGuard<'_, SchedulerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cancels the installed handle, if any, then installs one for the effective cadence.
    fn reinstall(&self, inner: &mut SchedulerInner) {
        if let Some(old) = inner.handle.take() {
            self.timer.cancel(old);
        }
        let every = inner.state.effective_interval();
        let handle = self.timer.schedule(every.as_duration(), self.tick.clone());
        debug!(handle = %handle, every = %every, "Installed tick timer");
        inner.handle = Some(handle);
    }

    fn fire_now(&self) {
        (self.tick)();
    }

    /// Installs the timer and fires one tick immediately. No-op when already scheduled.
    pub fn start(&self) {
        {
            let mut inner = self.inner();
            if inner.handle.is_some() {
                return;
            }
            self.reinstall(&mut inner);
            info!(
                interval = %inner.state.effective_interval(),
                mode = ?inner.state.mode(),
                "Scheduler started"
            );
        }
        self.fire_now();
    }

    /// Cancels the timer. In-flight ticks are left to complete.
    pub fn stop(&self) {
        let mut inner = self.inner();
        if let Some(handle) = inner.handle.take() {
            self.timer.cancel(handle);
            info!("Scheduler stopped");
        }
    }

    /// Replaces the configured interval.
    ///
    /// When running outside live mode the pending timer is cancelled and the
    /// next tick is one new interval from now. In live mode the value is only
    /// stored and applies once live mode is disabled.
    ///
    /// # Errors
    /// Returns [`SchedulerError::InvalidInterval`] for zero minutes.
    pub fn set_interval(&self, minutes: u32) -> Result<(), SchedulerError> {
        let interval =
            PollInterval::from_minutes(minutes).map_err(|_| SchedulerError::InvalidInterval(minutes))?;

        let mut inner = self.inner();
        inner.state.poll_interval = interval;
        if inner.handle.is_some() && !inner.state.live_mode_enabled {
            self.reinstall(&mut inner);
        }
        info!(interval = %interval, live = inner.state.live_mode_enabled, "Poll interval updated");
        Ok(())
    }

    /// Switches to the one-minute live cadence and fires one tick immediately.
    ///
    /// Starts the scheduler when idle. No-op when already live and scheduled.
    pub fn enable_live_mode(&self) {
        {
            let mut inner = self.inner();
            if inner.state.live_mode_enabled && inner.handle.is_some() {
                return;
            }
            inner.state.live_mode_enabled = true;
            self.reinstall(&mut inner);
            info!("Live tracking enabled");
        }
        self.fire_now();
    }

    /// Reverts to the configured interval without an immediate tick.
    pub fn disable_live_mode(&self) {
        let mut inner = self.inner();
        if !inner.state.live_mode_enabled {
            return;
        }
        inner.state.live_mode_enabled = false;
        if inner.handle.is_some() {
            self.reinstall(&mut inner);
        }
        info!(interval = %inner.state.poll_interval, "Live tracking disabled");
    }

    /// Whether a timer is installed.
    pub fn status(&self) -> SchedulerStatus {
        if self.inner().handle.is_some() {
            SchedulerStatus::Scheduled
        } else {
            SchedulerStatus::Idle
        }
    }

    /// Current cadence settings.
    pub fn tracking_state(&self) -> TrackingState {
        self.inner().state
    }

    /// Handle of the installed timer, if any.
    pub fn active_handle(&self) -> Option<TimerHandle> {
        self.inner().handle
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = inner.handle.take() {
            self.timer.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualTimer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn setup(minutes: u32) -> (Arc<ManualTimer>, Arc<AtomicUsize>, PollingScheduler) {
        let timer = Arc::new(ManualTimer::new());
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let tick: TickFn = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let scheduler = PollingScheduler::new(
            timer.clone(),
            tick,
            PollInterval::from_minutes(minutes).unwrap(),
        );
        (timer, ticks, scheduler)
    }

    #[test]
    fn test_start_fires_once_and_schedules() {
        let (timer, ticks, scheduler) = setup(5);
        assert_eq!(scheduler.status(), SchedulerStatus::Idle);

        scheduler.start();
        assert_eq!(scheduler.status(), SchedulerStatus::Scheduled);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        assert_eq!(timer.cadences(), vec![Duration::from_secs(300)]);

        // Starting twice does not stack timers
        scheduler.start();
        assert_eq!(timer.active_count(), 1);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        timer.fire_all();
        timer.fire_all();
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_set_interval_replaces_timer() {
        let (timer, ticks, scheduler) = setup(1);
        scheduler.start();
        let first = scheduler.active_handle().unwrap();

        scheduler.set_interval(5).unwrap();
        let second = scheduler.active_handle().unwrap();

        assert_ne!(first, second);
        assert!(!timer.is_active(first));
        assert_eq!(timer.cadences(), vec![Duration::from_secs(300)]);
        assert_eq!(timer.max_active(), 1);
        // Rescheduling does not fire immediately
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_interval_rejects_zero() {
        let (_timer, _ticks, scheduler) = setup(3);
        assert_eq!(
            scheduler.set_interval(0),
            Err(SchedulerError::InvalidInterval(0))
        );
        assert_eq!(scheduler.tracking_state().poll_interval.minutes(), 3);
    }

    #[test]
    fn test_set_interval_while_idle_does_not_schedule() {
        let (timer, _ticks, scheduler) = setup(3);
        scheduler.set_interval(10).unwrap();
        assert_eq!(timer.active_count(), 0);
        assert_eq!(scheduler.status(), SchedulerStatus::Idle);
    }

    #[test]
    fn test_live_mode_toggling() {
        let (timer, ticks, scheduler) = setup(15);
        scheduler.start();
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        scheduler.enable_live_mode();
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        assert_eq!(timer.cadences(), vec![Duration::from_secs(60)]);
        assert_eq!(scheduler.tracking_state().mode(), TrackingMode::Live);

        scheduler.disable_live_mode();
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        assert_eq!(timer.cadences(), vec![Duration::from_secs(900)]);

        scheduler.enable_live_mode();
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert_eq!(timer.cadences(), vec![Duration::from_secs(60)]);

        // Enabling again is a no-op
        scheduler.enable_live_mode();
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        assert_eq!(timer.max_active(), 1);
    }

    #[test]
    fn test_interval_change_during_live_mode_applies_after() {
        let (timer, _ticks, scheduler) = setup(2);
        scheduler.start();
        scheduler.enable_live_mode();

        scheduler.set_interval(30).unwrap();
        assert_eq!(timer.cadences(), vec![Duration::from_secs(60)]);
        assert_eq!(scheduler.tracking_state().effective_interval().minutes(), 1);

        scheduler.disable_live_mode();
        assert_eq!(timer.cadences(), vec![Duration::from_secs(1800)]);
        assert_eq!(timer.max_active(), 1);
    }

    #[test]
    fn test_live_mode_from_idle() {
        let (timer, ticks, scheduler) = setup(10);
        scheduler.enable_live_mode();
        assert_eq!(scheduler.status(), SchedulerStatus::Scheduled);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        assert_eq!(timer.cadences(), vec![Duration::from_secs(60)]);
    }

    #[test]
    fn test_stop_and_drop_clear_timer() {
        let (timer, ticks, scheduler) = setup(1);
        scheduler.start();
        scheduler.stop();
        assert_eq!(timer.active_count(), 0);
        assert_eq!(scheduler.status(), SchedulerStatus::Idle);

        // Disabling live mode while stopped does not reinstall
        scheduler.enable_live_mode();
        scheduler.stop();
        scheduler.disable_live_mode();
        assert_eq!(timer.active_count(), 0);

        // Re-enabling live mode after a stop restarts it
        scheduler.enable_live_mode();
        scheduler.stop();
        assert!(scheduler.tracking_state().live_mode_enabled);
        scheduler.enable_live_mode();
        assert_eq!(scheduler.status(), SchedulerStatus::Scheduled);
        assert_eq!(timer.active_count(), 1);
        assert_eq!(timer.cadences(), vec![Duration::from_secs(60)]);
        assert_eq!(ticks.load(Ordering::SeqCst), 4);
        scheduler.stop();
        scheduler.disable_live_mode();

        scheduler.start();
        assert_eq!(timer.active_count(), 1);
        drop(scheduler);
        assert_eq!(timer.active_count(), 0);
        assert_eq!(ticks.load(Ordering::SeqCst), 5);
    }
}

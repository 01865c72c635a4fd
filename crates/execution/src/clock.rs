//! Time source abstraction.

use chrono::{DateTime, Utc};

/// Port for time abstraction.
///
/// Samples are stamped through this so tests can use a fixed time.
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock.
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

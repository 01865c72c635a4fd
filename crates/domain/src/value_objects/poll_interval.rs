use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Poll cadence in whole minutes, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub struct PollInterval(u32);

impl PollInterval {
    /// Cadence used while live tracking is on.
    pub const ONE_MINUTE: PollInterval = PollInterval(1);

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] when `minutes` is zero.
    pub fn from_minutes(minutes: u32) -> Result<Self, DomainError> {
        if minutes == 0 {
            return Err(DomainError::InvalidInput(
                "poll interval must be at least one minute".into(),
            ));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.0) * 60)
    }
}

impl TryFrom<u32> for PollInterval {
    type Error = DomainError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::from_minutes(minutes)
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::ONE_MINUTE
    }
}

impl fmt::Display for PollInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}

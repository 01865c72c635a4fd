//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use il_tracker_execution::prelude::*;
//! ```

// Chart
pub use crate::chart::{ChartAxis, ChartData, ChartSeries};

// Clock
pub use crate::clock::{Clock, SystemClock};

// Scheduler
pub use crate::scheduler::{
    PollingScheduler, SchedulerError, SchedulerStatus, TickFn, Timer, TimerHandle, TokioTimer,
    TrackingState,
};

// Tracking
pub use crate::tracking::{
    LatestReading, LossTracker, PriceHistoryLog, TickOutcome, TrackerConfig,
};

// Wallet
pub use crate::wallet::{
    EnvWalletConnector, WalletAddress, WalletConnector, WalletError, WalletSession,
};

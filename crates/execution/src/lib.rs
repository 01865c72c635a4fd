//! Live tracking engine.
//!
//! This crate turns the pure loss calculation into a running tracker:
//! - Clock and timer ports
//! - Price history accumulation
//! - The per-tick fetch / calculate / record cycle
//! - Polling scheduler with live mode
//! - Chart projection of the history
//! - Display-only wallet connection

/// Prelude module for convenient imports.
pub mod prelude;

/// Chart projection.
pub mod chart;
/// Time source.
pub mod clock;
/// Polling scheduler and timer port.
pub mod scheduler;
/// Price history and tick processing.
pub mod tracking;
/// Wallet connection.
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

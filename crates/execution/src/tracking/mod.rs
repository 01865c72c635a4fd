//! Price history and tick processing.
//!
//! One tick of the tracker:
//! - Fetches both token prices
//! - Calculates impermanent loss for the configured amounts
//! - Appends a sample to the history when the figure is defined

mod history;
mod tracker;

pub use history::*;
pub use tracker::*;

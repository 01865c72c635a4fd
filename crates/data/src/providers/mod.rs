//! Price provider implementations.

mod coingecko;

pub use coingecko::{CoinGeckoProvider, CoinListing};

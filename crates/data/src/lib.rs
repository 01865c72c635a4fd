//! Market data access for the impermanent loss tracker.
//!
//! The core only needs one thing from the outside world: the USD price of a
//! set of tokens right now. [`PriceProvider`] is that port and
//! [`providers::CoinGeckoProvider`] is the HTTP adapter.

/// Price feed configuration.
pub mod config;
/// Price feed errors.
pub mod error;
/// Price provider implementations.
pub mod providers;

pub use config::PriceFeedConfig;
pub use error::PriceFeedError;

use async_trait::async_trait;
use il_tracker_domain::value_objects::PricePoint;
use std::collections::HashMap;

/// USD quotes returned by one feed request, keyed by token id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceQuotes {
    prices: HashMap<String, f64>,
}

impl PriceQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Price point for `token_id`; a missing key yields an unavailable point.
    pub fn point(&self, token_id: &str) -> PricePoint {
        PricePoint::new(token_id, self.prices.get(token_id).copied())
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(String, f64)> for PriceQuotes {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Source of spot USD prices.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the current USD price for each id.
    ///
    /// Ids the source knows nothing about are simply absent from the result.
    ///
    /// # Errors
    /// Returns [`PriceFeedError`] when the request itself fails.
    async fn get_prices(&self, ids: &[String]) -> Result<PriceQuotes, PriceFeedError>;
}

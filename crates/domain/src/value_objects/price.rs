use serde::{Deserialize, Serialize};

/// USD price of a token at one instant, or `None` when the feed had no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub token_id: String,
    pub usd_price: Option<f64>,
}

impl PricePoint {
    pub fn new(token_id: impl Into<String>, usd_price: Option<f64>) -> Self {
        Self {
            token_id: token_id.into(),
            usd_price,
        }
    }

    /// Point for a token the feed returned no price for.
    pub fn unavailable(token_id: impl Into<String>) -> Self {
        Self::new(token_id, None)
    }

    /// Returns the price only if it can be used in a calculation.
    pub fn usable(&self) -> Option<f64> {
        self.usd_price.filter(|p| p.is_finite() && *p > 0.0)
    }
}

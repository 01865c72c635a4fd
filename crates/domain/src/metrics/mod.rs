use serde::{Deserialize, Serialize};

pub mod impermanent_loss;

/// Outcome of comparing a pool position against holding the same tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpermanentLoss {
    /// Value of the original amounts at current prices.
    pub hold_value: f64,
    /// Value of the rebalanced pool amounts at current prices.
    pub lp_value: f64,
    /// Constant product `amount1 * amount2`.
    pub k: f64,
    /// Price of token 1 in units of token 2.
    pub price_ratio: f64,
    /// Pool amount of token 1 after rebalancing to `price_ratio`.
    pub new_amount1: f64,
    /// Pool amount of token 2 after rebalancing to `price_ratio`.
    pub new_amount2: f64,
    /// `lp_value / hold_value - 1`, e.g. -0.2 for a 20% loss.
    pub loss_fraction: f64,
}

impl ImpermanentLoss {
    /// Absolute difference in USD between the pool and holding.
    pub fn absolute_loss_usd(&self) -> f64 {
        self.lp_value - self.hold_value
    }

    /// Loss in percent, e.g. -20.0 for a 20% loss.
    pub fn loss_percent(&self) -> f64 {
        self.loss_fraction * 100.0
    }
}

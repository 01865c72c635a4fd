use crate::metrics::ImpermanentLoss;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observation of the tracked position.
///
/// Fields are read-only once the sample exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossSample {
    timestamp: DateTime<Utc>,
    price1: f64,
    price2: f64,
    hold_value: f64,
    lp_value: f64,
    impermanent_loss: f64,
}

impl LossSample {
    /// Builds a sample from the prices used and the resulting loss figures.
    pub fn new(timestamp: DateTime<Utc>, price1: f64, price2: f64, loss: &ImpermanentLoss) -> Self {
        Self {
            timestamp,
            price1,
            price2,
            hold_value: loss.hold_value,
            lp_value: loss.lp_value,
            impermanent_loss: loss.loss_fraction,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn price1(&self) -> f64 {
        self.price1
    }

    pub fn price2(&self) -> f64 {
        self.price2
    }

    pub fn hold_value(&self) -> f64 {
        self.hold_value
    }

    pub fn lp_value(&self) -> f64 {
        self.lp_value
    }

    /// Loss as a fraction, e.g. -0.2 for 20%.
    pub fn impermanent_loss(&self) -> f64 {
        self.impermanent_loss
    }
}

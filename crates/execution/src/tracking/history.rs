//! Append-only log of loss samples.

use crate::clock::Clock;
use il_tracker_domain::entities::LossSample;
use il_tracker_domain::metrics::ImpermanentLoss;
use tokio::sync::RwLock;
use tracing::debug;

/// Ordered record of every sample observed during the session.
///
/// Insertion order is chronological order; samples are never reordered,
/// deduplicated or removed.
#[derive(Debug, Default)]
pub struct PriceHistoryLog {
    /// Samples in append order.
    samples: RwLock<Vec<LossSample>>,
}

impl PriceHistoryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample. Callers must not append samples older than the latest one.
    pub async fn append(&self, sample: LossSample) {
        let mut samples = self.samples.write().await;
        debug_assert!(
            samples
                .last()
                .is_none_or(|last| last.timestamp() <= sample.timestamp()),
            "history samples must be appended in time order"
        );
        samples.push(sample);
        debug!(len = samples.len(), "Sample appended");
    }

    /// Creates a sample stamped with the current time and appends it.
    ///
    /// The timestamp is taken while holding the write lock, so samples from
    /// overlapping ticks end up in completion order with non-decreasing times.
    pub async fn record(
        &self,
        clock: &dyn Clock,
        price1: f64,
        price2: f64,
        loss: &ImpermanentLoss,
    ) -> LossSample {
        let mut samples = self.samples.write().await;
        let sample = LossSample::new(clock.now(), price1, price2, loss);
        samples.push(sample.clone());
        debug!(
            len = samples.len(),
            loss_pct = loss.loss_percent(),
            "Sample recorded"
        );
        sample
    }

    /// Copy of all samples appended so far.
    pub async fn snapshot(&self) -> Vec<LossSample> {
        self.samples.read().await.clone()
    }

    pub async fn latest(&self) -> Option<LossSample> {
        self.samples.read().await.last().cloned()
    }

    pub async fn len(&self) -> usize {
        self.samples.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.samples.read().await.is_empty()
    }
}

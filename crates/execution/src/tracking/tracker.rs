//! Tick processing for one tracked position.

use super::PriceHistoryLog;
use crate::clock::Clock;
use crate::scheduler::TickFn;
use chrono::NaiveDate;
use il_tracker_data::PriceProvider;
use il_tracker_domain::CalculationError;
use il_tracker_domain::entities::{LossSample, TokenPair, TokenPosition};
use il_tracker_domain::enums::Network;
use il_tracker_domain::metrics::ImpermanentLoss;
use il_tracker_domain::metrics::impermanent_loss::calculate_il_rebalanced;
use il_tracker_domain::value_objects::PricePoint;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Position being tracked, passed by value into every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Network the tokens were picked from.
    pub network: Network,
    /// First token and amount.
    pub position1: TokenPosition,
    /// Second token and amount.
    pub position2: TokenPosition,
    /// Date liquidity was provided. Display only.
    pub reference_date: NaiveDate,
}

impl TrackerConfig {
    /// Token ids of both positions.
    pub fn pair(&self) -> TokenPair {
        TokenPair::new(self.position1.token_id(), self.position2.token_id())
    }
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Both prices were present and a sample was appended.
    Recorded(LossSample),
    /// A price was missing or unusable; nothing was appended.
    PriceUnavailable(CalculationError),
    /// The feed request failed; nothing was appended.
    FetchFailed(String),
}

impl TickOutcome {
    /// Recorded sample, if any.
    pub fn sample(&self) -> Option<&LossSample> {
        match self {
            TickOutcome::Recorded(sample) => Some(sample),
            _ => None,
        }
    }
}

/// Most recent figures for the current configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    /// Price of the first token.
    pub price1: PricePoint,
    /// Price of the second token.
    pub price2: PricePoint,
    /// Loss figures, when both prices were usable.
    pub loss: Option<ImpermanentLoss>,
}

struct TrackerState {
    /// Current configuration.
    config: TrackerConfig,
    /// Bumped on every configuration change.
    generation: u64,
    /// Derived display state for `generation`.
    latest: Option<LatestReading>,
}

/// Runs ticks for one position and owns its price history.
pub struct LossTracker {
    /// Price source.
    provider: Arc<dyn PriceProvider>,
    /// Time source for sample stamps.
    clock: Arc<dyn Clock>,
    /// Observed samples.
    history: PriceHistoryLog,
    /// Configuration and display state.
    state: RwLock<TrackerState>,
}

impl LossTracker {
    /// Creates a tracker with an empty history.
    pub fn new(
        provider: Arc<dyn PriceProvider>,
        clock: Arc<dyn Clock>,
        config: TrackerConfig,
    ) -> Self {
        Self {
            provider,
            clock,
            history: PriceHistoryLog::new(),
            state: RwLock::new(TrackerState {
                config,
                generation: 0,
                latest: None,
            }),
        }
    }

    /// Fetches prices, calculates the loss and records a sample when defined.
    ///
    /// Never fails: every problem degrades to "no sample this tick".
    pub async fn tick(&self) -> TickOutcome {
        let (config, generation) = {
            let state = self.state.read().await;
            (state.config.clone(), state.generation)
        };
        let pair = config.pair();

        let quotes = match self.provider.get_prices(&pair.ids()).await {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!(
                    token1 = %pair.token1,
                    token2 = %pair.token2,
                    error = %e,
                    "Price fetch failed, skipping tick"
                );
                return TickOutcome::FetchFailed(e.to_string());
            }
        };

        let price1 = quotes.point(&pair.token1);
        let price2 = quotes.point(&pair.token2);

        let result = calculate_il_rebalanced(
            config.position1.amount(),
            config.position2.amount(),
            price1.usd_price,
            price2.usd_price,
        );

        let outcome = match result {
            Ok(loss) => {
                // Both prices passed the calculator's guard.
                let p1 = price1.usd_price.unwrap_or_default();
                let p2 = price2.usd_price.unwrap_or_default();
                let sample = self.history.record(self.clock.as_ref(), p1, p2, &loss).await;
                debug!(
                    token1 = %pair.token1,
                    token2 = %pair.token2,
                    lp_value = loss.lp_value,
                    hold_value = loss.hold_value,
                    loss_pct = loss.loss_percent(),
                    "Tick recorded"
                );
                TickOutcome::Recorded(sample)
            }
            Err(e) => {
                warn!(
                    token1 = %pair.token1,
                    token2 = %pair.token2,
                    price1 = ?price1.usd_price,
                    price2 = ?price2.usd_price,
                    reason = %e,
                    "Loss unavailable, skipping tick"
                );
                TickOutcome::PriceUnavailable(e)
            }
        };

        let mut state = self.state.write().await;
        // A config change while fetching makes this reading stale for display.
        if state.generation == generation {
            state.latest = Some(LatestReading {
                price1,
                price2,
                loss: result.ok(),
            });
        }

        outcome
    }

    /// Returns a callback that spawns a tick on the current tokio runtime.
    ///
    /// Ticks run independently, so a slow fetch does not delay the next one.
    pub fn tick_fn(self: &Arc<Self>) -> TickFn {
        let tracker = Arc::clone(self);
        Arc::new(move || {
            let tracker = Arc::clone(&tracker);
            match Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(async move {
                        tracker.tick().await;
                    });
                }
                Err(e) => warn!(error = %e, "No runtime available, tick skipped"),
            }
        })
    }

    /// Replaces the configuration and clears the derived display state.
    ///
    /// History is kept: it records what was observed, not what would be
    /// observed under the new configuration. Returns `false` when `config`
    /// equals the current one and nothing changed.
    pub async fn update_config(&self, config: TrackerConfig) -> bool {
        let mut state = self.state.write().await;
        if state.config == config {
            return false;
        }
        info!(
            token1 = %config.position1.token_id(),
            amount1 = config.position1.amount(),
            token2 = %config.position2.token_id(),
            amount2 = config.position2.amount(),
            reference_date = %config.reference_date,
            "Tracker configuration updated"
        );
        state.config = config;
        state.generation += 1;
        state.latest = None;
        true
    }

    /// Applies `config` and, when it changed, spawns a tick so the reading
    /// is refilled without waiting for the next scheduled one.
    pub async fn reconfigure(self: &Arc<Self>, config: TrackerConfig) -> bool {
        let changed = self.update_config(config).await;
        if changed {
            (self.tick_fn())();
        }
        changed
    }

    /// Current configuration.
    pub async fn config(&self) -> TrackerConfig {
        self.state.read().await.config.clone()
    }

    /// Figures from the last tick under the current configuration.
    pub async fn latest_reading(&self) -> Option<LatestReading> {
        self.state.read().await.latest.clone()
    }

    /// Samples observed so far.
    pub fn history(&self) -> &PriceHistoryLog {
        &self.history
    }
}

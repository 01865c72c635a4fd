//! Test doubles shared by the unit tests of this crate.

use crate::clock::Clock;
use crate::scheduler::{TickFn, Timer, TimerHandle};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use il_tracker_data::{PriceFeedError, PriceProvider, PriceQuotes};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Default)]
struct ManualTimerState {
    next_id: u64,
    active: BTreeMap<u64, (Duration, TickFn)>,
    max_active: usize,
}

/// Timer that only fires when told to and records what is scheduled.
#[derive(Default)]
pub struct ManualTimer {
    state: Mutex<ManualTimerState>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires every active callback once.
    pub fn fire_all(&self) {
        let tasks: Vec<TickFn> = {
            let state = self.state.lock().unwrap();
            state.active.values().map(|(_, t)| t.clone()).collect()
        };
        for task in tasks {
            task();
        }
    }

    /// Cadences of the active callbacks.
    pub fn cadences(&self) -> Vec<Duration> {
        let state = self.state.lock().unwrap();
        state.active.values().map(|(d, _)| *d).collect()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.state.lock().unwrap().active.contains_key(&handle.0)
    }

    /// Highest number of simultaneously active callbacks ever seen.
    pub fn max_active(&self) -> usize {
        self.state.lock().unwrap().max_active
    }
}

impl Timer for ManualTimer {
    fn schedule(&self, every: Duration, task: TickFn) -> TimerHandle {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.active.insert(id, (every, task));
        state.max_active = state.max_active.max(state.active.len());
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        self.state.lock().unwrap().active.remove(&handle.0);
    }

    fn active_count(&self) -> usize {
        self.state.lock().unwrap().active.len()
    }
}

/// Clock that only moves when advanced.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// One scripted reply of [`ScriptedPriceProvider`].
pub enum Reply {
    Quotes(Vec<(&'static str, f64)>),
    Fail(u16),
    /// Waits for the sender before answering with the quotes.
    Gated(oneshot::Receiver<()>, Vec<(&'static str, f64)>),
}

/// Price provider answering from a queue of scripted replies.
#[derive(Default)]
pub struct ScriptedPriceProvider {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPriceProvider {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Ids requested by each call, in call order.
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

fn quotes(prices: Vec<(&'static str, f64)>) -> PriceQuotes {
    prices.into_iter().map(|(id, p)| (id.to_string(), p)).collect()
}

#[async_trait]
impl PriceProvider for ScriptedPriceProvider {
    async fn get_prices(&self, ids: &[String]) -> Result<PriceQuotes, PriceFeedError> {
        self.requests.lock().unwrap().push(ids.to_vec());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Quotes(prices)) => Ok(quotes(prices)),
            Some(Reply::Fail(status)) => Err(PriceFeedError::Status { status }),
            Some(Reply::Gated(gate, prices)) => {
                let _ = gate.await;
                Ok(quotes(prices))
            }
            None => Err(PriceFeedError::Status { status: 503 }),
        }
    }
}

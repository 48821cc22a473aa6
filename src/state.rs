use std::sync::Arc;
use std::time::Duration;

use crate::config::{Args, Granularity};
use crate::counters::CounterStore;
use crate::pipeline::{RandomSimulator, Simulator};
use crate::rate_limit::FixedWindowLimiter;

// app's shared state, built once at startup and handed to every handler
pub struct AppState {
    pub counters: Arc<CounterStore>, // shared with the flush scheduler
    pub limiter: FixedWindowLimiter, // guards /stats/
    pub stats_limit: u64,            // max /stats/ calls per window
    pub stats_window: Duration,      // length of one window
    pub granularity: Granularity,    // time bucket of event keys
    pub simulator: Arc<dyn Simulator>,
}

impl AppState {
    pub fn from_args(args: &Args, counters: Arc<CounterStore>) -> Self {
        Self {
            counters,
            limiter: FixedWindowLimiter::new(),
            stats_limit: args.stats_limit,
            stats_window: args.stats_window(),
            granularity: args.granularity,
            simulator: Arc::new(RandomSimulator {
                max_delay: args.max_delay(),
                failure_rate: args.failure_rate,
                click_probability: args.click_probability,
            }),
        }
    }

    pub fn with_simulator(mut self, simulator: Arc<dyn Simulator>) -> Self {
        self.simulator = simulator;
        self
    }
}

pub mod config;
pub mod counters;
pub mod error;
pub mod flusher;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod rate_limit;
pub mod state;

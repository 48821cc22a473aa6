use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge,
    register_histogram,
};

use crate::error::AppError;

lazy_static! {
    pub static ref VIEWS_TOTAL: Counter =
        register_counter!("view_counter_views_total", "Total views recorded").unwrap();
    pub static ref CLICKS_TOTAL: Counter =
        register_counter!("view_counter_clicks_total", "Total simulated clicks recorded").unwrap();
    pub static ref ORPHAN_CLICKS: Counter = register_counter!(
        "view_counter_orphan_clicks_total",
        "Clicks rejected because their key was never viewed"
    )
    .unwrap();
    pub static ref PROCESSING_FAILURES: Counter = register_counter!(
        "view_counter_processing_failures_total",
        "Simulated processing failures"
    )
    .unwrap();
    pub static ref STATS_ALLOWED: Counter =
        register_counter!("view_counter_stats_allowed_total", "Stats requests admitted").unwrap();
    pub static ref STATS_DENIED: Counter =
        register_counter!("view_counter_stats_denied_total", "Stats requests rate limited").unwrap();
    pub static ref FLUSH_TOTAL: Counter =
        register_counter!("view_counter_flushes_total", "Completed flushes").unwrap();
    pub static ref FLUSH_FAILURES: Counter =
        register_counter!("view_counter_flush_failures_total", "Failed flushes").unwrap();
    pub static ref FLUSH_LATENCY: Histogram = register_histogram!(
        "view_counter_flush_latency_seconds",
        "Snapshot, serialize and write latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_KEYS: Gauge =
        register_gauge!("view_counter_tracked_keys", "Current number of counter entries").unwrap();
}

// Renders every registered metric in the text exposition format
pub fn render() -> Result<String, AppError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_registered_counters() {
        VIEWS_TOTAL.inc();
        FLUSH_FAILURES.inc_by(0.0);
        let text = render().unwrap();
        assert!(text.contains("view_counter_views_total"));
        assert!(text.contains("view_counter_flush_failures_total"));
    }
}

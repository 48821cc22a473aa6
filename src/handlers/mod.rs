mod health;
mod metrics;
mod stats;
mod view;
mod welcome;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use stats::stats_handler;
pub use view::view_handler;
pub use welcome::welcome_handler;

// Unknown paths get the welcome text, like a catch-all "/" route
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/view/", get(view_handler))
        .route("/stats/", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .fallback(welcome_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

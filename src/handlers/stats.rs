use axum::{extract::State, http::StatusCode};
use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::metrics::{STATS_ALLOWED, STATS_DENIED};
use crate::state::AppState;

// Only the limiter is consulted; the body is intentionally empty.
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> AppResult<StatusCode> {
    if !state.limiter.allow(state.stats_limit, state.stats_window) {
        STATS_DENIED.inc();
        debug!(limit = state.stats_limit, window = ?state.stats_window, "stats rate limited");
        return Err(AppError::RateLimited);
    }
    STATS_ALLOWED.inc();
    Ok(StatusCode::OK)
}

use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use crate::error::AppResult;
use crate::pipeline::record_event;
use crate::state::AppState;

pub async fn view_handler(State(state): State<Arc<AppState>>) -> AppResult<StatusCode> {
    record_event(
        &state.counters,
        state.simulator.as_ref(),
        state.granularity,
        chrono::Utc::now(),
    )
    .await?;
    Ok(StatusCode::OK)
}

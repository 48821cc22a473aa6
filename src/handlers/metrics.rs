use crate::error::AppResult;
use crate::metrics::render;

pub async fn metrics_handler() -> AppResult<String> {
    render()
}

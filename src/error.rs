use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// Errors surfaced to HTTP callers
#[derive(Error, Debug)]
pub enum AppError {
    #[error("simulated processing failed")]
    ProcessingFailed,
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ProcessingFailed => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only the status code carries meaning for the two expected outcomes.
        match self {
            AppError::Internal(message) => (status, message).into_response(),
            _ => status.into_response(),
        }
    }
}

impl From<prometheus::Error> for AppError {
    fn from(e: prometheus::Error) -> Self {
        AppError::Internal(format!("metrics encoding: {e}"))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("click recorded for key {0:?} with no prior view")]
    UnknownKey(String),
}

#[derive(Error, Debug)]
pub enum FlushError {
    #[error("serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("write snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("flush task panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type AppResult<T> = Result<T, AppError>;

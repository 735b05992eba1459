//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] pairdesk_core::CoreError),

    #[error("API error: {0}")]
    Api(#[from] pairdesk_api::ApiError),
}

pub type AppResult<T> = Result<T, AppError>;

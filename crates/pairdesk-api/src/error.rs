//! API error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Transport-level failure (no usable response from the server).
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::HttpClient(_))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

//! Error types for the BookGetter REST API

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with an error status; carries its `message`
    #[error("{0}")]
    Request(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// 401/403, or a session that is not logged in
    #[error("Please login to continue")]
    Unauthorized,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// The backend could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect() || e.is_timeout())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

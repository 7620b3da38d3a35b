//! Failure taxonomy for the refresh path.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Outcome of a failed refresh or query.
///
/// None of these are fatal to the process: the scheduler logs and moves to
/// the next asset, the HTTP layer maps them to a status code. A provider or
/// storage failure never overwrites the last-known-good record.
#[derive(Error, Debug)]
pub enum RefreshError {
    /// Empty or malformed asset identifier. Rejected before any I/O.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// The provider call failed, timed out, or returned a non-success status.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider responded, but the value is non-numeric or outside the
    /// RSI domain.
    #[error("invalid sample: {0}")]
    InvalidSample(String),

    /// Repository read or write failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Bad configuration value, caught at construction time.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl IntoResponse for RefreshError {
    fn into_response(self) -> Response {
        let status = match &self {
            RefreshError::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            RefreshError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
            RefreshError::InvalidSample(_) => StatusCode::BAD_GATEWAY,
            RefreshError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RefreshError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RefreshError>;

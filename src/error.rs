//! Error types for the cache library and playground server
//!
//! Provides unified error handling using thiserror. Cache misses are never
//! errors at the library level; they surface as `Option::None`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for cache construction and the HTTP layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Cache constructed with an unusable configuration (zero capacity, zero shards)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Key not found (or expired) when the caller asked for a definite value
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backing store rejected a write-through
    #[error("Backing store error: {0}")]
    BackingStore(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::BackingStore(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::InvalidConfig(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;

//! Response DTOs for the playground API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for the GET operation (GET /:policy/get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// Policy that served the lookup
    pub policy: String,
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(
        policy: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            policy: policy.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the SET operation (PUT /:policy/set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// Key pushed out to make room, if the policy evicted one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evicted: Option<String>,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(policy: &str, key: impl Into<String>, evicted: Option<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set in {} cache", key, policy),
            key,
            evicted,
        }
    }
}

/// Response body for the DELETE operation (DELETE /:policy/del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(policy: &str, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted from {} cache", key, policy),
            key,
        }
    }
}

/// Response body for memoized calls (GET /memo/:function/:arg)
#[derive(Debug, Clone, Serialize)]
pub struct MemoResponse {
    pub function: String,
    pub arg: u64,
    pub result: u64,
    /// Whether the result came from the cache rather than a fresh computation
    pub cached: bool,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

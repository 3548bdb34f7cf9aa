//! API Module
//!
//! HTTP handlers and routing for the cache playground.
//!
//! # Endpoints
//! - `PUT /:policy/set` - Store a key-value pair
//! - `GET /:policy/get/:key` - Retrieve a value by key
//! - `DELETE /:policy/del/:key` - Delete a key
//! - `GET /:policy/stats` - Policy statistics
//! - `GET /:policy/distribution` - Per-shard key counts (sharded only)
//! - `GET /:policy/report` - Usage report with top keys (monitored only)
//! - `GET /memo/:function/:arg` - Memoized demo function
//! - `GET /memo/stats` - Memoization hit/miss counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;
pub mod state;

pub use handlers::*;
pub use routes::create_router;
pub use state::{AppState, Policy, PolicySet};

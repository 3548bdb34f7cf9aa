//! API Routes
//!
//! Configures the Axum router with all playground endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, distribution_handler, get_handler, health_handler, memo_handler,
    memo_stats_handler, report_handler, set_handler, stats_handler,
};
use super::state::AppState;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /:policy/set` - Store a key-value pair
/// - `GET /:policy/get/:key` - Retrieve a value by key
/// - `DELETE /:policy/del/:key` - Delete a key
/// - `GET /:policy/stats` - Policy-specific statistics
/// - `GET /sharded/distribution` - Keys per shard
/// - `GET /monitored/report` - Monitored cache report
/// - `GET /memo/:function/:arg` - Memoized demo function
/// - `GET /memo/stats` - Memoization statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // `distribution` and `report` stay under `:policy` so every policy name
    // resolves through the same route segment.
    Router::new()
        .route("/health", get(health_handler))
        .route("/memo/stats", get(memo_stats_handler))
        .route("/memo/:function/:arg", get(memo_handler))
        .route("/:policy/set", put(set_handler))
        .route("/:policy/get/:key", get(get_handler))
        .route("/:policy/del/:key", delete(delete_handler))
        .route("/:policy/stats", get(stats_handler))
        .route("/:policy/distribution", get(distribution_handler))
        .route("/:policy/report", get(report_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

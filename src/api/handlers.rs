//! API Handlers
//!
//! HTTP request handlers for each playground endpoint. Policy routing lives
//! in [`PolicySet`](super::state::PolicySet); handlers only validate input and
//! shape responses.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use super::state::{AppState, Policy};
use crate::cache::{MemoStats, MonitorReport, ShardSnapshot};
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, MemoResponse, SetRequest, SetResponse,
};

/// Handler for PUT /:policy/set
///
/// Stores a key-value pair in the named policy.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(policy): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let policy: Policy = policy.parse()?;

    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut caches = state.caches.write().await;
    let evicted = caches.set(policy, req.key.clone(), req.value)?;

    Ok(Json(SetResponse::new(policy.as_str(), req.key, evicted)))
}

/// Handler for GET /:policy/get/:key
///
/// Takes the write lock: every policy updates bookkeeping on reads.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((policy, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let policy: Policy = policy.parse()?;

    let mut caches = state.caches.write().await;
    let value = caches
        .get(policy, &key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(policy.as_str(), key, value)))
}

/// Handler for DELETE /:policy/del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((policy, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let policy: Policy = policy.parse()?;

    let mut caches = state.caches.write().await;
    if !caches.delete(policy, &key)? {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(policy.as_str(), key)))
}

/// Handler for GET /:policy/stats
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(policy): Path<String>,
) -> Result<Json<Value>> {
    let policy: Policy = policy.parse()?;

    let caches = state.caches.read().await;
    Ok(Json(caches.stats(policy)?))
}

/// Handler for GET /:policy/distribution
///
/// Only the sharded policy has a distribution.
pub async fn distribution_handler(
    State(state): State<AppState>,
    Path(policy): Path<String>,
) -> Result<Json<Vec<ShardSnapshot<String>>>> {
    require(policy.parse()?, Policy::Sharded, "distribution")?;

    let caches = state.caches.read().await;
    Ok(Json(caches.sharded.distribution()))
}

/// Handler for GET /:policy/report
///
/// Only the monitored policy produces a report.
pub async fn report_handler(
    State(state): State<AppState>,
    Path(policy): Path<String>,
) -> Result<Json<MonitorReport<String>>> {
    require(policy.parse()?, Policy::Monitored, "report")?;

    let caches = state.caches.read().await;
    Ok(Json(caches.monitored.report()))
}

fn require(policy: Policy, expected: Policy, endpoint: &str) -> Result<()> {
    if policy != expected {
        return Err(CacheError::InvalidRequest(format!(
            "'{endpoint}' is only available for the {expected} policy"
        )));
    }
    Ok(())
}

// == Memoized Functions ==

/// Handler for GET /memo/:function/:arg
///
/// Evaluates one of the demo functions through the memoization cache.
pub async fn memo_handler(
    State(state): State<AppState>,
    Path((function, arg)): Path<(String, u64)>,
) -> Result<Json<MemoResponse>> {
    let compute = memo_function(&function)?;

    let mut caches = state.caches.write().await;
    let hits_before = caches.memo.stats().hits;
    let result = caches
        .memo
        .try_memoize(&function, &[arg], |args| compute(args[0]))?;
    let cached = caches.memo.stats().hits > hits_before;

    Ok(Json(MemoResponse {
        function,
        arg,
        result,
        cached,
    }))
}

/// Handler for GET /memo/stats
pub async fn memo_stats_handler(State(state): State<AppState>) -> Json<MemoStats> {
    let caches = state.caches.read().await;
    Json(caches.memo.stats())
}

fn memo_function(name: &str) -> Result<fn(u64) -> Result<u64>> {
    match name {
        "square" => Ok(square),
        "fib" => Ok(fibonacci),
        "factorial" => Ok(factorial),
        other => Err(CacheError::InvalidRequest(format!(
            "Unknown memo function '{other}'"
        ))),
    }
}

fn overflow(function: &str, n: u64) -> CacheError {
    CacheError::InvalidRequest(format!("{function}({n}) overflows u64"))
}

fn square(n: u64) -> Result<u64> {
    n.checked_mul(n).ok_or_else(|| overflow("square", n))
}

fn fibonacci(n: u64) -> Result<u64> {
    // u128 holds the look-ahead term while the answer still fits in u64
    let (mut a, mut b) = (0u128, 1u128);
    for _ in 0..n {
        (a, b) = (b, a + b);
        if a > u128::from(u64::MAX) {
            return Err(overflow("fib", n));
        }
    }
    Ok(a as u64)
}

fn factorial(n: u64) -> Result<u64> {
    (1..=n).try_fold(1u64, |acc, k| {
        acc.checked_mul(k).ok_or_else(|| overflow("factorial", n))
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

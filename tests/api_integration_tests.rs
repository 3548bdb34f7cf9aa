//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each endpoint, plus one run
//! against a live server over TCP.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cache_lab::{create_router, AppState, Config};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_app(config: &Config) -> Router {
    let state = AppState::from_config(config).unwrap();
    create_router(state)
}

fn create_test_app() -> Router {
    create_app(&Config::default())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn put_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn set(app: &Router, policy: &str, key: &str, value: &str) -> Value {
    let body = format!(r#"{{"key":"{key}","value":"{value}"}}"#);
    let (status, json) = put_json(app, &format!("/{policy}/set"), &body).await;
    assert_eq!(status, StatusCode::OK, "set {key} in {policy}");
    json
}

const POLICIES: [&str; 6] = [
    "ttl",
    "lru",
    "multi-level",
    "write-through",
    "monitored",
    "sharded",
];

// == SET / GET / DELETE Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let json = set(&app, "lru", "test_key", "test_value").await;

    assert!(json["message"].as_str().unwrap().contains("test_key"));
    assert!(json.get("evicted").is_none());
}

#[tokio::test]
async fn test_round_trip_every_policy() {
    let app = create_test_app();

    for policy in POLICIES {
        set(&app, policy, "shared", policy).await;

        let (status, json) = send(&app, "GET", &format!("/{policy}/get/shared")).await;
        assert_eq!(status, StatusCode::OK, "{policy}");
        assert_eq!(json["value"].as_str().unwrap(), policy);
        assert_eq!(json["policy"].as_str().unwrap(), policy);

        let (status, _) = send(&app, "DELETE", &format!("/{policy}/del/shared")).await;
        assert_eq!(status, StatusCode::OK, "{policy}");

        let (status, _) = send(&app, "GET", &format!("/{policy}/get/shared")).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{policy}");
    }
}

#[tokio::test]
async fn test_delete_endpoint_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app, "DELETE", "/sharded/del/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_unknown_policy_rejected() {
    let app = create_test_app();

    let (status, json) = put_json(&app, "/lfu/set", r#"{"key":"k","value":"v"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("lfu"));
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let (status, _) = put_json(&app, "/ttl/set", "not json").await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app();

    let (status, json) = put_json(&app, "/ttl/set", r#"{"key":"","value":"v"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

// == Policy Behaviour Tests ==

#[tokio::test]
async fn test_lru_eviction_via_api() {
    let config = Config {
        lru_max_size: 3,
        ..Config::default()
    };
    let app = create_app(&config);

    for key in ["A", "B", "C"] {
        set(&app, "lru", key, key).await;
    }
    let json = set(&app, "lru", "D", "D").await;
    assert_eq!(json["evicted"].as_str().unwrap(), "A");

    let (status, _) = send(&app, "GET", "/lru/get/A").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = send(&app, "GET", "/lru/stats").await;
    assert_eq!(stats["size"], 3);
    assert_eq!(stats["evictions"], 1);
}

#[tokio::test]
async fn test_multi_level_stats_via_api() {
    let config = Config {
        l1_max_size: 1,
        l2_max_size: 10,
        ..Config::default()
    };
    let app = create_app(&config);

    set(&app, "multi-level", "a", "1").await;
    set(&app, "multi-level", "b", "2").await;

    // "a" fell out of L1 and is served from L2, then promoted
    send(&app, "GET", "/multi-level/get/a").await;
    send(&app, "GET", "/multi-level/get/a").await;
    send(&app, "GET", "/multi-level/get/zzz").await;

    let (_, stats) = send(&app, "GET", "/multi-level/stats").await;
    assert_eq!(stats["l2_hits"], 1);
    assert_eq!(stats["l1_hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["l1_entries"], 1);
}

#[tokio::test]
async fn test_monitored_report_via_api() {
    let app = create_test_app();

    set(&app, "monitored", "hot", "1").await;
    set(&app, "monitored", "cold", "2").await;
    for _ in 0..3 {
        send(&app, "GET", "/monitored/get/hot").await;
    }
    send(&app, "GET", "/monitored/get/missing").await;

    let (status, report) = send(&app, "GET", "/monitored/report").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["sets"], 2);
    assert_eq!(report["gets"], 4);
    assert_eq!(report["hits"], 3);
    assert_eq!(report["misses"], 1);
    assert_eq!(report["top_keys"][0]["key"], "hot");
    assert_eq!(report["top_keys"][0]["hits"], 3);
}

#[tokio::test]
async fn test_monitored_report_forgets_deleted_keys() {
    let app = create_test_app();

    for i in 0..20 {
        let key = format!("temp{i}");
        set(&app, "monitored", &key, "v").await;
        send(&app, "GET", &format!("/monitored/get/{key}")).await;
        let (status, _) = send(&app, "DELETE", &format!("/monitored/del/{key}")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, report) = send(&app, "GET", "/monitored/report").await;
    assert_eq!(report["entries"], 0);
    assert_eq!(report["hits"], 20);
    assert!(report["top_keys"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_sharded_distribution_via_api() {
    let app = create_test_app();

    for i in 0..20 {
        set(&app, "sharded", &format!("key{i}"), "v").await;
    }

    let (status, shards) = send(&app, "GET", "/sharded/distribution").await;
    assert_eq!(status, StatusCode::OK);

    let shards = shards.as_array().unwrap();
    assert_eq!(shards.len(), 4);
    let total: u64 = shards.iter().map(|s| s["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 20);
}

#[tokio::test]
async fn test_memo_endpoint_caches_results() {
    let app = create_test_app();

    let (status, first) = send(&app, "GET", "/memo/factorial/10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["result"], 3_628_800);
    assert_eq!(first["cached"], false);

    let (_, second) = send(&app, "GET", "/memo/factorial/10").await;
    assert_eq!(second["cached"], true);

    let (_, stats) = send(&app, "GET", "/memo/stats").await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let config = Config {
        ttl_seconds: 1,
        ..Config::default()
    };
    let app = create_app(&config);

    set(&app, "ttl", "short", "lived").await;
    let (status, _) = send(&app, "GET", "/ttl/get/short").await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let (status, _) = send(&app, "GET", "/ttl/get/short").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Health / Live Server ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_live_server_round_trip() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, create_test_app()).await.unwrap();
    });

    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    let response = client
        .put(format!("{base}/write-through/set"))
        .json(&serde_json::json!({"key": "live", "value": "over-tcp"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let json: Value = client
        .get(format!("{base}/write-through/get/live"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["value"], "over-tcp");

    let stats: Value = client
        .get(format!("{base}/write-through/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["writes"], 1);
    assert_eq!(stats["cache_hits"], 1);
    assert_eq!(stats["stored_entries"], 1);

    server.abort();
}

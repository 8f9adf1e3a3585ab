//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against an in-memory store.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use object_cache::{api::create_router, AppState, ConnectOptions, ObjectCache};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

async fn create_test_app() -> Router {
    let cache = ObjectCache::create("memory://", ConnectOptions::default())
        .await
        .unwrap();
    create_router(AppState::new(cache))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == SET / GET / DEL ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app().await;

    let response = app
        .oneshot(put_json(
            "/set",
            json!({ "key": "test_key", "value": { "hello": "world" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("test_key"));
    assert_eq!(json["ack"], "OK");
}

#[tokio::test]
async fn test_set_get_delete_roundtrip() {
    let app = create_test_app().await;
    let value = json!({ "hello": "world", "nested": { "list": [1, 2, 3] } });

    let response = app
        .clone()
        .oneshot(put_json("/set", json!({ "key": "my:key", "value": value })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/get/my:key")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "my:key");
    assert_eq!(json["value"], value);

    let response = app.clone().oneshot(delete("/del/my:key")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["deleted"], 1);

    let response = app.clone().oneshot(get("/get/my:key")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(delete("/del/my:key")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app().await;

    let response = app.oneshot(get("/get/BAD-KEY")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("BAD-KEY"));
}

#[tokio::test]
async fn test_set_endpoint_empty_key() {
    let app = create_test_app().await;

    let response = app
        .oneshot(put_json("/set", json!({ "key": "", "value": 1 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_set_endpoint_malformed_body() {
    let app = create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"value": 1"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid request"));
}

#[tokio::test]
async fn test_set_endpoint_missing_key_field() {
    let app = create_test_app().await;

    let response = app
        .oneshot(put_json("/set", json!({ "value": 1 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("key"));
}

#[tokio::test]
async fn test_hset_and_expire_reject_wrong_field_types() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(put_json("/hset", json!({ "key": "k", "value": 1 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_to_json(response.into_body()).await.get("error").is_some());

    let response = app
        .oneshot(put_json("/expire", json!({ "key": "k", "ttl": "soon" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_to_json(response.into_body()).await.get("error").is_some());
}

// == Hash Endpoints ==

#[tokio::test]
async fn test_hash_lifecycle() {
    let app = create_test_app().await;
    let value = json!({ "hello": "world" });

    let response = app
        .clone()
        .oneshot(put_json(
            "/hset",
            json!({ "key": "my:hash:key", "field": "my:field", "value": value }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["created"], true);

    let response = app
        .clone()
        .oneshot(get("/hget/my:hash:key/my:field"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["value"], value);

    let response = app
        .clone()
        .oneshot(delete("/hdel/my:hash:key/my:field"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Removing the only field removed the hash
    let response = app.oneshot(delete("/del/my:hash:key")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hgetall_and_hlen() {
    let app = create_test_app().await;
    let value = json!({ "hello": "world" });

    for field in ["my:field", "field2"] {
        let response = app
            .clone()
            .oneshot(put_json(
                "/hset",
                json!({ "key": "my:hash:key", "field": field, "value": value }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(get("/hgetall/my:hash:key")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["fields"], json!({ "my:field": value, "field2": value }));

    let response = app.clone().oneshot(get("/hlen/my:hash:key")).await.unwrap();
    assert_eq!(body_to_json(response.into_body()).await["len"], 2);

    let response = app.oneshot(get("/hlen/no:such:hash")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["len"], 0);
}

#[tokio::test]
async fn test_get_on_hash_is_conflict() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(put_json(
            "/hset",
            json!({ "key": "my:hash:key", "field": "f", "value": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/get/my:hash:key")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(
        json["error"],
        "WRONGTYPE Operation against a key holding the wrong kind of value"
    );
}

// == Expiration Endpoints ==

#[tokio::test]
async fn test_ttl_sentinels() {
    let app = create_test_app().await;

    let response = app.clone().oneshot(get("/ttl/nonexistent")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["raw"], -2);
    assert_eq!(json["ttl"]["state"], "missing");

    app.clone()
        .oneshot(put_json("/set", json!({ "key": "forever", "value": 1 })))
        .await
        .unwrap();
    let response = app.oneshot(get("/ttl/forever")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["raw"], -1);
    assert_eq!(json["ttl"]["state"], "persistent");
}

#[tokio::test]
async fn test_set_with_ttl_then_expire() {
    let app = create_test_app().await;

    app.clone()
        .oneshot(put_json("/set", json!({ "key": "k", "value": "v", "ttl": 10 })))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/ttl/k")).await.unwrap();
    assert_eq!(body_to_json(response.into_body()).await["raw"], 10);

    let response = app
        .clone()
        .oneshot(put_json("/expire", json!({ "key": "k", "ttl": 60 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/ttl/k")).await.unwrap();
    assert_eq!(body_to_json(response.into_body()).await["raw"], 60);

    let response = app
        .oneshot(put_json("/expire", json!({ "key": "missing", "ttl": 60 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Health Endpoint ==

#[tokio::test]
async fn test_health_endpoint() {
    let cache = ObjectCache::create("memory://", ConnectOptions::default())
        .await
        .unwrap();
    let state = AppState::new(cache);
    let app = create_router(state.clone());

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["connection"], "connected");

    state.cache.quit().await.unwrap();

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["connection"], "closed");

    let response = app.oneshot(get("/get/anything")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

//! HTTP tests for the todo endpoints.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{body_bytes, expect_json, TestApp};
use serde_json::json;
use todos_service::CONTENT_REQUIRED;

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get("/todos", None).await;
    let body = expect_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["error"], "Invalid token");
    assert_eq!(app.remote.get_calls(), 0);
}

#[tokio::test]
async fn test_bad_token_is_unauthorized() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/todos")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_scheme_is_unauthorized() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/todos")
        .header(header::AUTHORIZATION, format!("Basic {}", app.token("alice")))
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_first_list_returns_seed() {
    let app = TestApp::new();

    let response = app.get("/todos", Some("alice")).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(
        body,
        json!([
            {"id": 1, "content": "Create new todo"},
            {"id": 2, "content": "Update me"},
            {"id": 3, "content": "Delete example ones"}
        ])
    );
    assert!(app.remote.value("todos:user:alice").is_some());
}

#[tokio::test]
async fn test_create_then_list() {
    let app = TestApp::new();

    let response = app.post_json("/todos", "alice", r#"{"content":"  Buy milk  "}"#).await;
    let created = expect_json(response, StatusCode::OK).await;
    assert_eq!(created, json!({"id": 4, "content": "Buy milk"}));

    let listed = expect_json(app.get("/todos", Some("alice")).await, StatusCode::OK).await;
    let ids: Vec<u64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_create_publishes_audit_event() {
    let app = TestApp::new();

    let response = app.post_json("/todos", "alice", r#"{"content":"x"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(app.remote.wait_for_publish_calls(1).await);
    let published = app.remote.published();
    assert_eq!(published[0].0, "log_channel");
    let event: serde_json::Value = serde_json::from_str(&published[0].1).unwrap();
    assert_eq!(event["opName"], "CREATE");
    assert_eq!(event["username"], "alice");
    assert_eq!(event["todoId"], 4);
}

#[tokio::test]
async fn test_create_rejects_bad_content() {
    let app = TestApp::new();

    for body in [
        r#"{}"#,
        r#"{"content":""}"#,
        r#"{"content":"   "}"#,
        r#"{"content":42}"#,
        r#"{"content":null}"#,
        r#"not json"#,
    ] {
        let response = app.post_json("/todos", "alice", body).await;
        let json = expect_json(response, StatusCode::BAD_REQUEST).await;
        assert_eq!(json["error"], CONTENT_REQUIRED, "body: {}", body);
    }

    let listed = expect_json(app.get("/todos", Some("alice")).await, StatusCode::OK).await;
    assert_eq!(listed.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_without_content_type_is_bad_request() {
    let app = TestApp::new();
    let request = app.request(
        Method::POST,
        "/todos",
        Some("alice"),
        Body::from(r#"{"content":"x"}"#),
    );

    let response = app.send(request).await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["error"], CONTENT_REQUIRED);
}

#[tokio::test]
async fn test_delete_then_list() {
    let app = TestApp::new();

    let response = app.delete("/todos/2", "alice").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());

    let listed = expect_json(app.get("/todos", Some("alice")).await, StatusCode::OK).await;
    assert_eq!(
        listed,
        json!([
            {"id": 1, "content": "Create new todo"},
            {"id": 3, "content": "Delete example ones"}
        ])
    );
}

#[tokio::test]
async fn test_deleted_ids_are_not_reused() {
    let app = TestApp::new();

    assert_eq!(app.delete("/todos/3", "alice").await.status(), StatusCode::NO_CONTENT);
    let created = expect_json(
        app.post_json("/todos", "alice", r#"{"content":"next"}"#).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(created["id"], 4);
}

#[tokio::test]
async fn test_delete_unknown_is_not_found() {
    let app = TestApp::new();

    for uri in ["/todos/99", "/todos/abc"] {
        let response = app.delete(uri, "alice").await;
        let body = expect_json(response, StatusCode::NOT_FOUND).await;
        assert_eq!(body["error"], "Todo not found");
    }
}

#[tokio::test]
async fn test_delete_requires_canonical_id() {
    let app = TestApp::new();
    app.post_json("/todos", "alice", r#"{"content":"keep"}"#).await;

    for uri in ["/todos/+4", "/todos/04"] {
        let response = app.delete(uri, "alice").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {}", uri);
    }

    let listed = expect_json(app.get("/todos", Some("alice")).await, StatusCode::OK).await;
    assert_eq!(listed.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_users_are_isolated() {
    let app = TestApp::new();

    app.post_json("/todos", "alice", r#"{"content":"mine"}"#).await;

    let bob = expect_json(app.get("/todos", Some("bob")).await, StatusCode::OK).await;
    assert_eq!(bob.as_array().unwrap().len(), 3);
    assert_eq!(app.delete("/todos/4", "bob").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_disconnected_remote_serves_from_local_store() {
    let app = TestApp::disconnected();

    let created = expect_json(
        app.post_json("/todos", "alice", r#"{"content":"offline"}"#).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(created["id"], 4);

    let listed = expect_json(app.get("/todos", Some("alice")).await, StatusCode::OK).await;
    assert_eq!(listed.as_array().unwrap().len(), 4);
    assert_eq!(app.remote.get_calls(), 0);
    assert_eq!(app.remote.publish_calls(), 0);
    assert!(app.local.get("alice").is_some());
}

#[tokio::test]
async fn test_remote_write_failure_lands_in_local_store() {
    let app = TestApp::new();
    app.get("/todos", Some("alice")).await;
    app.remote.fail_sets(true);

    let response = app.post_json("/todos", "alice", r#"{"content":"x"}"#).await;
    let created = expect_json(response, StatusCode::OK).await;
    assert_eq!(created["id"], 4);

    let local = app.local.get("alice").unwrap();
    assert_eq!(local.len(), 4);
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = TestApp::new();

    for response in [
        app.get("/todos", Some("alice")).await,
        app.get("/todos", None).await,
        app.get("/health", None).await,
    ] {
        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-xss-protection"], "1; mode=block");
        assert!(headers.contains_key("strict-transport-security"));
        assert!(headers.contains_key("x-request-id"));
    }
}

#[tokio::test]
async fn test_public_endpoints_need_no_token() {
    let app = TestApp::new();

    let root = expect_json(app.get("/", None).await, StatusCode::OK).await;
    assert_eq!(root["service"], "todos-api");
    assert_eq!(root["cache_mode"], "remote");
    assert_eq!(root["status"], "running");

    let health = expect_json(app.get("/health", None).await, StatusCode::OK).await;
    assert_eq!(health["status"], "healthy");

    assert_eq!(app.get("/live", None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_reports_remote_connectivity() {
    let app = TestApp::new();

    let ready = expect_json(app.get("/ready", None).await, StatusCode::OK).await;
    assert_eq!(ready["remote_cache"], "connected");

    app.remote.set_connected(false);
    let ready = expect_json(app.get("/ready", None).await, StatusCode::OK).await;
    assert_eq!(ready["status"], "ready");
    assert_eq!(ready["remote_cache"], "disconnected");
    assert_eq!(ready["cache_mode"], "local");
}

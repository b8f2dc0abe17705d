// ABOUTME: Router tests for the external data sources endpoints
// ABOUTME: Authentication, team scoping, provisioning responses and rollback behavior

mod common;

use axum::http::Method;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{FakeSyncService, TestApp};

const SOURCES: &str = "/api/external_data_sources";

fn stripe_body() -> serde_json::Value {
    json!({"account_id": "acct_123", "client_secret": "sk_test"})
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_api_key_returns_401() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, SOURCES, None, None).await;

    assert_eq!(status, 401);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_api_key_returns_401() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(Method::GET, SOURCES, Some("tly_not-a-real-key"), None)
        .await;

    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_x_api_token_header_is_accepted() {
    let app = TestApp::new().await;
    let request = axum::http::Request::builder()
        .uri(SOURCES)
        .header("X-API-Token", &app.token)
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_no_current_team_is_rejected_before_provisioning() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("drifter@example.com").await;

    let (status, _) = app
        .request(Method::POST, SOURCES, Some(&token), Some(stripe_body()))
        .await;

    assert_eq!(status, 401);
    assert!(app.sync.calls().is_empty());
}

#[tokio::test]
async fn test_non_member_is_forbidden() {
    let app = TestApp::new().await;
    let (user_id, token) = app.create_user("outsider@example.com").await;
    sqlx::query("UPDATE users SET current_team_id = ? WHERE id = ?")
        .bind(app.team_id)
        .bind(&user_id)
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app
        .request(Method::POST, SOURCES, Some(&token), Some(stripe_body()))
        .await;

    assert_eq!(status, 403);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    assert!(app.sync.calls().is_empty());
}

#[tokio::test]
async fn test_create_source_provisions_and_returns_201() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::POST, SOURCES, Some(stripe_body())).await;

    assert_eq!(status, 201);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["source_id"], "src-1");
    assert_eq!(
        app.sync.calls(),
        vec![
            "create_source:acct_123".to_string(),
            format!("create_destination:{}", app.team_id),
            "create_connection:src-1:dst-1".to_string(),
            "start_sync:conn-1".to_string(),
        ]
    );

    let (status, body) = app.call(Method::GET, SOURCES, None).await;
    assert_eq!(status, 200);
    let sources = body["data"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["status"], "running");
    assert_eq!(sources[0]["source_type"], "Stripe");
    assert_eq!(sources[0]["created_by"]["email"], "ada@example.com");
    assert!(sources[0].get("client_secret").is_none());
}

#[tokio::test]
async fn test_create_source_requires_credentials() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(Method::POST, SOURCES, Some(json!({"account_id": "acct_123"})))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(app.sync.calls().is_empty());
}

#[tokio::test]
async fn test_destination_failure_returns_502_and_deletes_source() {
    let app = TestApp::with_sync(FakeSyncService {
        fail_destination: true,
        ..Default::default()
    })
    .await;

    let (status, body) = app.call(Method::POST, SOURCES, Some(stripe_body())).await;

    assert_eq!(status, 502);
    assert_eq!(body["error"]["code"], "PROVISIONING_FAILED");
    assert_eq!(
        app.sync.calls().last().map(String::as_str),
        Some("delete_source:src-1")
    );

    let (_, body) = app.call(Method::GET, SOURCES, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_and_delete_source() {
    let app = TestApp::new().await;
    app.call(Method::POST, SOURCES, Some(stripe_body())).await;
    let (_, body) = app.call(Method::GET, SOURCES, None).await;
    let id = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = app.call(Method::GET, &format!("{SOURCES}/{id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["source_id"], "src-1");

    let (status, _) = app.call(Method::DELETE, &format!("{SOURCES}/{id}"), None).await;
    assert_eq!(status, 204);

    let (status, _) = app.call(Method::GET, &format!("{SOURCES}/{id}"), None).await;
    assert_eq!(status, 404);

    // Remote resources are left alone
    assert!(!app.sync.calls().iter().any(|c| c.starts_with("delete_")));
}

#[tokio::test]
async fn test_list_search_filters_by_source_id() {
    let app = TestApp::new().await;
    app.call(Method::POST, SOURCES, Some(stripe_body())).await;

    let (_, hit) = app.call(Method::GET, &format!("{SOURCES}?search=src"), None).await;
    let (_, miss) = app.call(Method::GET, &format!("{SOURCES}?search=nope"), None).await;

    assert_eq!(hit["data"].as_array().unwrap().len(), 1);
    assert!(miss["data"].as_array().unwrap().is_empty());
}

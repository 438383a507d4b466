use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, TestContext};

#[tokio::test]
async fn refresh_issues_new_access_token_only() {
    let ctx = TestContext::new().await;
    let (_, refresh_token) = ctx.register_and_authenticate(&test_email()).await;

    let response = ctx
        .server
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": refresh_token }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["accessToken"].as_str().is_some());
    assert_eq!(body["expiresIn"], 900);
    // The refresh token is not rotated: no new one is returned.
    assert!(body.get("refreshToken").is_none());
}

#[tokio::test]
async fn refreshed_access_token_authorizes_requests() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let (_, refresh_token) = ctx.register_and_authenticate(&email).await;

    let body: serde_json::Value = ctx
        .server
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": refresh_token }))
        .await
        .json();
    let new_access = body["accessToken"].as_str().unwrap();

    let response = ctx
        .server
        .get("/auth/profile")
        .authorization_bearer(new_access)
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["email"], email);
}

#[tokio::test]
async fn refresh_token_remains_valid_after_use() {
    let ctx = TestContext::new().await;
    let (_, refresh_token) = ctx.register_and_authenticate(&test_email()).await;

    let payload = json!({ "refreshToken": refresh_token });

    ctx.server
        .post("/auth/refresh")
        .json(&payload)
        .await
        .assert_status(StatusCode::OK);

    // Not rotated and not revoked: a second refresh also succeeds.
    ctx.server
        .post("/auth/refresh")
        .json(&payload)
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn refresh_with_garbage_token_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": "not-a-token" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_with_access_token_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let (access_token, _) = ctx.register_and_authenticate(&test_email()).await;

    // Distinct secrets: an access token can never pass as a refresh token.
    let response = ctx
        .server
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": access_token }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_with_empty_token_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

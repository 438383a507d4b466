use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

async fn register_and_login(ctx: &TestContext) -> (String, String) {
    let email = test_email();

    ctx.server
        .post("/auth/register")
        .json(&json!({
            "email": &email,
            "password": test_password()
        }))
        .await;

    ctx.server
        .post("/auth/login")
        .json(&json!({
            "email": &email,
            "password": test_password()
        }))
        .await;

    let code = ctx.mailbox.last_code_for(&email).expect("code emailed");
    (email, code)
}

#[tokio::test]
async fn correct_code_returns_user_and_tokens() {
    let ctx = TestContext::new().await;
    let (email, code) = register_and_login(&ctx).await;

    let response = ctx
        .server
        .post("/auth/verify-mfa")
        .json(&json!({ "email": &email, "code": code }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], email);
    assert!(body["tokens"]["accessToken"].as_str().is_some());
    assert!(body["tokens"]["refreshToken"].as_str().is_some());
    assert_eq!(body["tokens"]["expiresIn"], 900); // 15m in seconds
}

#[tokio::test]
async fn code_verifies_exactly_once() {
    let ctx = TestContext::new().await;
    let (email, code) = register_and_login(&ctx).await;

    let payload = json!({ "email": &email, "code": code });

    ctx.server
        .post("/auth/verify-mfa")
        .json(&payload)
        .await
        .assert_status(StatusCode::OK);

    // Replay with the same code fails.
    ctx.server
        .post("/auth/verify-mfa")
        .json(&payload)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_code_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let (email, code) = register_and_login(&ctx).await;

    // Any code other than the issued one.
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let response = ctx
        .server
        .post("/auth/verify-mfa")
        .json(&json!({ "email": &email, "code": wrong }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_code_fails_even_when_correct() {
    let ctx = TestContext::new().await;
    let (email, code) = register_and_login(&ctx).await;

    ctx.codes.expire_all();

    let response = ctx
        .server
        .post("/auth/verify-mfa")
        .json(&json!({ "email": &email, "code": code }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn code_is_bound_to_its_user() {
    let ctx = TestContext::new().await;
    let (_email, code) = register_and_login(&ctx).await;

    // A second user cannot redeem the first user's code.
    let other = test_email();
    ctx.server
        .post("/auth/register")
        .json(&json!({
            "email": &other,
            "password": test_password()
        }))
        .await;

    let response = ctx
        .server
        .post("/auth/verify-mfa")
        .json(&json!({ "email": &other, "code": code }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_email_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/verify-mfa")
        .json(&json!({ "email": test_email(), "code": "123456" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

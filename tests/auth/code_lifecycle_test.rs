use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn expired_codes_are_swept() {
    let ctx = TestContext::new().await;
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

    assert_eq!(ctx.codes.count(), 1);

    // Nothing is expired yet: the sweep is a no-op.
    assert_eq!(ctx.auth.clean_expired_codes().await.unwrap(), 0);
    assert_eq!(ctx.codes.count(), 1);

    ctx.codes.expire_all();

    assert_eq!(ctx.auth.clean_expired_codes().await.unwrap(), 1);
    assert_eq!(ctx.codes.count(), 0);
}

#[tokio::test]
async fn swept_code_no_longer_verifies() {
    let ctx = TestContext::new().await;
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

    let code = ctx.mailbox.last_code_for(&email).unwrap();

    ctx.codes.expire_all();
    ctx.auth.clean_expired_codes().await.unwrap();

    ctx.server
        .post("/auth/verify-mfa")
        .json(&json!({ "email": &email, "code": code }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(controller::register))
        .route("/login", post(controller::login))
        .route("/verify-mfa", post(controller::verify_mfa))
        .route("/refresh", post(controller::refresh))
        .route("/profile", get(controller::profile))
        .route("/validate-token", post(controller::validate_token))
}

use axum::{routing::get, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn product_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/products",
        get(controller::list_products).post(controller::create_product),
    )
}

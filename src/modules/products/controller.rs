use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use super::interface::ProductError;
use super::schema::{
    CreateProductRequest, CreateProductResponse, ProductListResponse, ProductResponse,
};
use crate::AppState;

pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProductListResponse>, ProductError> {
    let products = state.products.list().await?;

    Ok(Json(ProductListResponse {
        success: true,
        data: products.into_iter().map(ProductResponse::from).collect(),
    }))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<CreateProductResponse>), ProductError> {
    req.validate()
        .map_err(|e| ProductError::Validation(e.to_string()))?;

    let product = state.products.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            success: true,
            data: product.into(),
        }),
    ))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::Product;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 3, max = 255, message = "Name must be 3-255 characters"))]
    pub name: String,
    #[validate(length(min = 3, max = 255, message = "Description must be 3-255 characters"))]
    pub description: String,
    #[validate(range(min = 0.0, max = 1000000.0, message = "Price out of range"))]
    pub price: f64,
    #[validate(range(min = 0, max = 100, message = "Stock out of range"))]
    pub stock: i32,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub data: Vec<ProductResponse>,
}

#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub success: bool,
    pub data: ProductResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::interface::{ProductRepository, Result};
use super::model::Product;
use super::schema::CreateProductRequest;

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        self.products.list().await
    }

    pub async fn create(&self, req: CreateProductRequest) -> Result<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            created_at: now,
            updated_at: now,
        };

        self.products.create(&product).await?;

        Ok(product)
    }
}

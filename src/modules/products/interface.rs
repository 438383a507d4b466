use async_trait::async_trait;
use axum::{http::StatusCode, response::IntoResponse, Json};

use super::model::Product;
use crate::modules::auth::schema::ErrorResponse;

pub type Result<T> = std::result::Result<T, ProductError>;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>>;
    async fn create(&self, product: &Product) -> Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ProductError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

use async_trait::async_trait;
use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};

use super::model::{CodeType, User, VerificationCode};
use super::schema::ErrorResponse;

pub type Result<T> = std::result::Result<T, AuthError>;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn email_exists(&self, email: &str) -> Result<bool>;
}

#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Invalidates every active code of the same (user, type) and inserts the
    /// new one. Must be atomic with respect to concurrent logins for the same
    /// user, so the one-active-code invariant holds under races.
    async fn replace_active(&self, code: &VerificationCode) -> Result<()>;

    async fn find_active(
        &self,
        user_id: &str,
        code: &str,
        code_type: CodeType,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>>;

    async fn mark_used(&self, id: &str) -> Result<()>;

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired verification code")]
    InvalidMfaCode,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Access token not provided")]
    MissingToken,

    #[error("Refresh token required")]
    MissingRefreshToken,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmailAlreadyExists => StatusCode::CONFLICT,
            Self::InvalidCredentials
            | Self::InvalidMfaCode
            | Self::InvalidToken
            | Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::MissingRefreshToken | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // Unexpected failures are logged with detail and surfaced generically.
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                "Internal server error".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

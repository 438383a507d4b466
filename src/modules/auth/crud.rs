use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::interface::{AuthError, Result, UserRepository, VerificationCodeRepository};
use super::model::{CodeType, User, VerificationCode};
use crate::config::DbPool;

// =============================================================================
// USERS
// =============================================================================

#[derive(Clone)]
pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            // Unique violation on users.email: registration raced a duplicate.
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::EmailAlreadyExists,
            _ => AuthError::from(e),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 > 0)
    }
}

// =============================================================================
// VERIFICATION CODES
// =============================================================================

#[derive(Clone)]
pub struct PgVerificationCodeRepository {
    pool: DbPool,
}

impl PgVerificationCodeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationCodeRepository for PgVerificationCodeRepository {
    async fn replace_active(&self, code: &VerificationCode) -> Result<()> {
        // Invalidate-then-insert in one transaction: two concurrent logins
        // must not end up with zero or two active codes.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE verification_codes
            SET is_used = TRUE
            WHERE user_id = $1 AND code_type = $2 AND is_used = FALSE AND expires_at > $3
            "#,
        )
        .bind(&code.user_id)
        .bind(code.code_type.as_str())
        .bind(code.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO verification_codes (id, user_id, code, code_type, is_used, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&code.id)
        .bind(&code.user_id)
        .bind(&code.code)
        .bind(code.code_type.as_str())
        .bind(code.is_used)
        .bind(code.expires_at)
        .bind(code.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn find_active(
        &self,
        user_id: &str,
        code: &str,
        code_type: CodeType,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>> {
        let found = sqlx::query_as::<_, VerificationCode>(
            r#"
            SELECT * FROM verification_codes
            WHERE user_id = $1 AND code = $2 AND code_type = $3
              AND is_used = FALSE AND expires_at > $4
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(code_type.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found)
    }

    async fn mark_used(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE verification_codes SET is_used = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

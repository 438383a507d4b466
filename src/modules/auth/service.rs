use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::interface::{AuthError, Result, UserRepository, VerificationCodeRepository};
use super::model::{CodeType, User, VerificationCode};
use crate::services::email::EmailService;
use crate::services::hashing;
use crate::services::jwt::{Claims, JwtService, TokenPair};
use crate::services::mfa;

/// Outcome of login step 1: the code went out by email, the client gets an
/// opaque correlation token and the code's expiry. Never the code itself.
#[derive(Debug)]
pub struct LoginChallenge {
    pub temp_token: String,
    pub expires_at: chrono::DateTime<Utc>,
}

#[derive(Debug)]
pub struct MfaVerification {
    pub user: User,
    pub tokens: TokenPair,
}

#[derive(Debug)]
pub struct RefreshedAccess {
    pub access_token: String,
    pub expires_in: i64,
}

/// Composes credential checks, the MFA code lifecycle, token issuance and
/// email dispatch into the register / login / verify / refresh flows.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    codes: Arc<dyn VerificationCodeRepository>,
    email: EmailService,
    jwt: Arc<JwtService>,
    code_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        codes: Arc<dyn VerificationCodeRepository>,
        email: EmailService,
        jwt: Arc<JwtService>,
        code_expiration_minutes: i64,
    ) -> Self {
        Self {
            users,
            codes,
            email,
            jwt,
            code_ttl: Duration::minutes(code_expiration_minutes),
        }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<User> {
        if self.users.email_exists(email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash =
            hashing::hash_password(password).map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash,
            first_name,
            last_name,
            is_active: true,
            created_at: Utc::now(),
        };

        self.users.create(&user).await?;

        // Welcome email is best-effort: registration succeeds regardless.
        if let Err(e) = self
            .email
            .send_welcome(&user.email, user.full_name().as_deref())
            .await
        {
            tracing::warn!(email = %user.email, error = %e, "failed to send welcome email");
        }

        Ok(user)
    }

    /// Step 1 of login. Absent user, inactive user and wrong password all
    /// collapse into the same `InvalidCredentials` so the response shape
    /// never reveals which check failed.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginChallenge> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        let is_valid = hashing::verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let expires_at = self.issue_code(&user, CodeType::LoginMfa).await?;

        let temp_token = format!("temp_{}_{}", user.id, Utc::now().timestamp_millis());

        Ok(LoginChallenge {
            temp_token,
            expires_at,
        })
    }

    /// Step 2 of login: consume the emailed code, issue the token pair.
    pub async fn verify_mfa(&self, email: &str, code: &str) -> Result<MfaVerification> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidMfaCode)?;

        let verification = self
            .codes
            .find_active(&user.id, code, CodeType::LoginMfa, Utc::now())
            .await?
            .ok_or(AuthError::InvalidMfaCode)?;

        self.codes.mark_used(&verification.id).await?;

        let tokens = self
            .jwt
            .generate_pair(&user)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(MfaVerification { user, tokens })
    }

    /// Mints a new access token from a valid refresh token. The refresh token
    /// itself is not rotated.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedAccess> {
        if refresh_token.is_empty() {
            return Err(AuthError::MissingRefreshToken);
        }

        let (access_token, expires_in) = self
            .jwt
            .refresh_access_token(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(RefreshedAccess {
            access_token,
            expires_in,
        })
    }

    pub async fn profile(&self, access_token: &str) -> Result<User> {
        let claims = self
            .jwt
            .verify_access_token(access_token)
            .map_err(|_| AuthError::InvalidToken)?;

        self.users
            .find_by_id(&claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::InvalidToken)
    }

    /// Token-only check: verifies the signature and expiry and returns the
    /// identity carried in the claims, without touching the database.
    pub fn validate_token(&self, access_token: &str) -> Result<Claims> {
        self.jwt
            .verify_access_token(access_token)
            .map_err(|_| AuthError::InvalidToken)
    }

    pub async fn clean_expired_codes(&self) -> Result<u64> {
        self.codes.delete_expired(Utc::now()).await
    }

    /// Generates a fresh code for (user, type), invalidating any active
    /// predecessor, and emails it. Email failure is logged and swallowed:
    /// the login response stays successful (original behavior, see DESIGN.md).
    async fn issue_code(
        &self,
        user: &User,
        code_type: CodeType,
    ) -> Result<chrono::DateTime<Utc>> {
        let now = Utc::now();
        let verification = VerificationCode {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            code: mfa::generate_code(),
            code_type,
            is_used: false,
            expires_at: now + self.code_ttl,
            created_at: now,
        };

        self.codes.replace_active(&verification).await?;

        let name = user.full_name();
        let sent = match code_type {
            CodeType::LoginMfa => {
                self.email
                    .send_mfa_code(&user.email, &verification.code, name.as_deref())
                    .await
            }
            CodeType::PasswordReset => {
                self.email
                    .send_password_reset_code(&user.email, &verification.code, name.as_deref())
                    .await
            }
            CodeType::EmailVerification => Ok(()),
        };

        if let Err(e) = sent {
            tracing::error!(
                email = %user.email,
                code_type = code_type.as_str(),
                error = %e,
                "failed to send verification code email"
            );
        }

        Ok(verification.expires_at)
    }
}

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display name used in email greetings: "First Last", "First", or none.
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeType {
    LoginMfa,
    PasswordReset,
    EmailVerification,
}

impl CodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeType::LoginMfa => "LOGIN_MFA",
            CodeType::PasswordReset => "PASSWORD_RESET",
            CodeType::EmailVerification => "EMAIL_VERIFICATION",
        }
    }
}

impl TryFrom<String> for CodeType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "LOGIN_MFA" => Ok(CodeType::LoginMfa),
            "PASSWORD_RESET" => Ok(CodeType::PasswordReset),
            "EMAIL_VERIFICATION" => Ok(CodeType::EmailVerification),
            other => Err(format!("unknown code type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct VerificationCode {
    pub id: String,
    pub user_id: String,
    pub code: String,
    #[sqlx(try_from = "String")]
    pub code_type: CodeType,
    pub is_used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && self.expires_at > now
    }
}

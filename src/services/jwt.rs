use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::modules::auth::model::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Signs and verifies bearer tokens. Access and refresh tokens carry the same
/// claim set but use distinct secrets and lifetimes, so one can never pass for
/// the other.
pub struct JwtService {
    access_secret: String,
    refresh_secret: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtService {
    pub fn new(
        access_secret: String,
        refresh_secret: String,
        access_expiration: &str,
        refresh_expiration: &str,
    ) -> Result<Self, String> {
        let access_ttl_secs = parse_expiration(access_expiration)
            .ok_or_else(|| format!("invalid JWT_ACCESS_EXPIRATION: {}", access_expiration))?;
        let refresh_ttl_secs = parse_expiration(refresh_expiration)
            .ok_or_else(|| format!("invalid JWT_REFRESH_EXPIRATION: {}", refresh_expiration))?;

        Ok(Self {
            access_secret,
            refresh_secret,
            access_ttl_secs,
            refresh_ttl_secs,
        })
    }

    pub fn generate_pair(&self, user: &User) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let access_token = self.sign(self.claims_for(user, self.access_ttl_secs), &self.access_secret)?;
        let refresh_token =
            self.sign(self.claims_for(user, self.refresh_ttl_secs), &self.refresh_secret)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl_secs,
        })
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(token, &self.access_secret)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(token, &self.refresh_secret)
    }

    /// Mints a fresh access token from a valid refresh token, carrying the
    /// identity claims over with a new iat/exp. The refresh token is untouched.
    pub fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<(String, i64), jsonwebtoken::errors::Error> {
        let claims = self.verify_refresh_token(refresh_token)?;

        let now = Utc::now().timestamp();
        let access_token = self.sign(
            Claims {
                iat: now,
                exp: now + self.access_ttl_secs,
                ..claims
            },
            &self.access_secret,
        )?;

        Ok((access_token, self.access_ttl_secs))
    }

    pub fn access_expires_in_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    fn claims_for(&self, user: &User, ttl_secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            iat: now,
            exp: now + ttl_secs,
        }
    }

    fn sign(&self, claims: Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    fn verify(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

/// Parses an expiration string by unit suffix ("15m", "7d", "30s", "12h").
/// Unsuffixed values are raw seconds.
pub fn parse_expiration(value: &str) -> Option<i64> {
    let value = value.trim();
    let (number, multiplier) = match value.as_bytes().last()? {
        b's' => (&value[..value.len() - 1], 1),
        b'm' => (&value[..value.len() - 1], 60),
        b'h' => (&value[..value.len() - 1], 3600),
        b'd' => (&value[..value.len() - 1], 86400),
        _ => (value, 1),
    };

    number.parse::<i64>().ok().map(|n| n * multiplier)
}

use std::env;

/// Environment configuration
/// Loads and validates environment variables
pub struct Config {
    pub database_url: String,
    pub jwt_access_secret: String,
    pub jwt_refresh_secret: String,
    pub jwt_access_expiration: String,
    pub jwt_refresh_expiration: String,
    pub mfa_code_expiration_minutes: i64,
    pub port: u16,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_access_secret =
            env::var("JWT_ACCESS_SECRET").map_err(|_| "JWT_ACCESS_SECRET must be set".to_string())?;

        let jwt_refresh_secret = env::var("JWT_REFRESH_SECRET")
            .map_err(|_| "JWT_REFRESH_SECRET must be set".to_string())?;

        let jwt_access_expiration =
            env::var("JWT_ACCESS_EXPIRATION").unwrap_or_else(|_| "15m".to_string());

        let jwt_refresh_expiration =
            env::var("JWT_REFRESH_EXPIRATION").unwrap_or_else(|_| "7d".to_string());

        let mfa_code_expiration_minutes = match env::var("MFA_CODE_EXPIRATION_MINUTES") {
            Ok(value) => value
                .parse::<i64>()
                .map_err(|_| "MFA_CODE_EXPIRATION_MINUTES must be an integer".to_string())?,
            Err(_) => 10,
        };

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| "PORT must be a valid port number".to_string())?,
            Err(_) => 8000,
        };

        Ok(Self {
            database_url,
            jwt_access_secret,
            jwt_refresh_secret,
            jwt_access_expiration,
            jwt_refresh_expiration,
            mfa_code_expiration_minutes,
            port,
            smtp: Self::smtp_from_env()?,
        })
    }

    // SMTP is optional: with an incomplete block the mail service is disabled
    // and every send fails with a logged error instead of refusing to boot.
    fn smtp_from_env() -> Result<Option<SmtpConfig>, String> {
        let host = env::var("SMTP_HOST").ok();
        let port = env::var("SMTP_PORT").ok();
        let user = env::var("SMTP_USER").ok();
        let pass = env::var("SMTP_PASS").ok();

        let (host, port, user, pass) = match (host, port, user, pass) {
            (Some(h), Some(p), Some(u), Some(s)) => (h, p, u, s),
            _ => return Ok(None),
        };

        let port = port
            .parse::<u16>()
            .map_err(|_| "SMTP_PORT must be a valid port number".to_string())?;

        let from = env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@yourapp.com".to_string());

        Ok(Some(SmtpConfig {
            host,
            port,
            user,
            pass,
            from,
        }))
    }
}

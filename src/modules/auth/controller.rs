use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use super::interface::AuthError;
use super::schema::{
    LoginRequest, LoginResponse, ProfileResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, RegisterResponse, TokenUserResponse, UserResponse, ValidateTokenResponse,
    VerifyMfaRequest, VerifyMfaResponse,
};
use crate::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let user = state
        .auth
        .register(&req.email, &req.password, req.first_name, req.last_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User created successfully",
            user: UserResponse::from(&user),
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let challenge = state.auth.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Verification code sent to your email",
        temp_token: challenge.temp_token,
        expires_at: challenge.expires_at,
    }))
}

pub async fn verify_mfa(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyMfaRequest>,
) -> Result<Json<VerifyMfaResponse>, AuthError> {
    let result = state.auth.verify_mfa(&req.email, &req.code).await?;

    Ok(Json(VerifyMfaResponse {
        success: true,
        message: "Authentication completed successfully",
        user: UserResponse::from(&result.user),
        tokens: result.tokens.into(),
    }))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AuthError> {
    let refreshed = state.auth.refresh(&req.refresh_token).await?;

    Ok(Json(RefreshResponse {
        success: true,
        message: "Token refreshed successfully",
        access_token: refreshed.access_token,
        expires_in: refreshed.expires_in,
    }))
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, AuthError> {
    let token = bearer_token(&headers)?;
    let user = state.auth.profile(token).await?;

    Ok(Json(ProfileResponse {
        success: true,
        user: UserResponse::from(&user),
    }))
}

pub async fn validate_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ValidateTokenResponse>, AuthError> {
    let token = bearer_token(&headers)?;
    let claims = state.auth.validate_token(token)?;

    Ok(Json(ValidateTokenResponse {
        success: true,
        message: "Token is valid",
        user: TokenUserResponse {
            id: claims.sub,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
        },
    }))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)
}

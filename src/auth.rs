use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub exp: i64,
}

/// The authenticated subject. Ownership checks bind to `id` (the stable
/// `sub` claim), never to the email string.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

pub fn issue_token(id: &str, email: &str, name: &str, secret: &str) -> Result<String, AppError> {
    let claims = Claims {
        sub: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        exp: (Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Upstream(format!("failed to sign token: {e}")))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Resolve the caller from the bearer JWT, rejecting missing, malformed,
/// or expired tokens.
pub fn require_user(headers: &HeaderMap, secret: &str) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    Ok(AuthUser {
        id: data.claims.sub,
        email: data.claims.email,
        name: data.claims.name,
    })
}

/// Operator endpoints use a shared admin token rather than a user JWT.
pub fn require_operator(headers: &HeaderMap, admin_token: &str) -> Result<(), AppError> {
    match bearer_token(headers) {
        Some(token) if token == admin_token => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

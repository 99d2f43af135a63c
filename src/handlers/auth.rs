use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::User;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

fn user_json(id: &str, email: &str, name: &str, picture: Option<&str>) -> serde_json::Value {
    serde_json::json!({ "id": id, "email": email, "name": name, "picture": picture })
}

// POST /auth/google
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAuthRequest {
    pub id_token: String,
}

pub async fn google(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GoogleAuthRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.id_token.is_empty() {
        return Err(AppError::Validation("idToken is required".to_string()));
    }

    let claims = state
        .identity
        .verify_id_token(&body.id_token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Google token verification failed");
            AppError::Unauthorized
        })?;

    let token = auth::issue_token(&claims.id, &claims.email, &claims.name, &state.config.jwt_secret)?;

    Ok(Json(serde_json::json!({
        "token": token,
        "user": user_json(&claims.id, &claims.email, &claims.name, claims.picture.as_deref()),
    })))
}

// POST /auth/signup
#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.email.is_empty() || body.password.is_empty() || body.name.is_empty() {
        return Err(AppError::Validation(
            "Email, password, and name are required".to_string(),
        ));
    }
    if body.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(body.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?
        .to_string();

    let user = User {
        id: format!("user_{}", Uuid::new_v4().simple()),
        email: body.email.clone(),
        name: body.name.clone(),
        password_hash: Some(password_hash),
        picture: None,
        created_at: Utc::now().naive_utc(),
    };

    {
        let db = state.db.lock().unwrap();
        if queries::find_user_by_email(&db, &body.email)?.is_some() {
            return Err(AppError::Validation(
                "User with this email already exists".to_string(),
            ));
        }
        queries::create_user(&db, &user)?;
    }

    let token = auth::issue_token(&user.id, &user.email, &user.name, &state.config.jwt_secret)?;

    Ok(Json(serde_json::json!({
        "token": token,
        "user": user_json(&user.id, &user.email, &user.name, None),
    })))
}

// POST /auth/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = {
        let db = state.db.lock().unwrap();
        queries::find_user_by_email(&db, &body.email)?
    }
    .ok_or(AppError::Unauthorized)?;

    let stored_hash = user.password_hash.as_deref().ok_or(AppError::Unauthorized)?;
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AppError::Unauthorized)?;
    Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized)?;

    let token = auth::issue_token(&user.id, &user.email, &user.name, &state.config.jwt_secret)?;

    Ok(Json(serde_json::json!({
        "token": token,
        "user": user_json(&user.id, &user.email, &user.name, user.picture.as_deref()),
    })))
}

// GET /auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = auth::require_user(&headers, &state.config.jwt_secret)?;
    Ok(Json(serde_json::json!({
        "user": user_json(&user.id, &user.email, &user.name, None),
    })))
}

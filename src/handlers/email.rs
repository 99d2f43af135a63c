use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::auth;
use crate::errors::AppError;
use crate::services::email::EmailMessage;
use crate::state::AppState;

// POST /email/send
#[derive(Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
}

pub async fn send_email(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SendEmailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_user(&headers, &state.config.jwt_secret)?;

    if body.to.is_empty() || body.subject.is_empty() || body.html.is_empty() {
        return Err(AppError::Validation(
            "to, subject, and html are required".to_string(),
        ));
    }

    let message = EmailMessage {
        to: body.to,
        subject: body.subject,
        html: body.html,
        text: body.text,
    };

    state.email.send(&message).await.map_err(|e| {
        tracing::error!(error = %e, "email send failed");
        AppError::Upstream("failed to send email".to_string())
    })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Email sent successfully",
    })))
}

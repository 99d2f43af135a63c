use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error taxonomy for the booking API. Guard violations and business-rule
/// rejections are returned, not thrown, and are never retried.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Cannot cancel booking less than 6 hours before scheduled time")]
    TooLateToCancel,

    // Deliberately generic: the computed signature is never echoed back.
    #[error("Invalid payment signature")]
    InvalidSignature,

    #[error("feedback has already been submitted for this booking")]
    AlreadyHasFeedback,

    #[error("unauthorized")]
    Unauthorized,

    #[error("upstream service error: {0}")]
    Upstream(String),
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::TooLateToCancel => StatusCode::BAD_REQUEST,
            AppError::InvalidSignature => StatusCode::BAD_REQUEST,
            AppError::AlreadyHasFeedback => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;

/// Field name → message, for form-style validation failures.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Shown for every export failure; the cause goes to the log only.
pub const EXPORT_FAILED_MESSAGE: &str = "There was an error generating the PDF. Please try again.";
/// Shown when the auth collaborator fails unexpectedly.
pub const GENERIC_RETRY_MESSAGE: &str = "An error occurred. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The auth collaborator rejected the request (wrong credentials,
    /// email taken). Carries the single user-facing message.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Confirmation required")]
    ConfirmationRequired,

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Please correct the highlighted fields".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::AuthFailed(msg) => (StatusCode::UNAUTHORIZED, "AUTH_FAILED", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::ConfirmationRequired => (
                StatusCode::BAD_REQUEST,
                "CONFIRMATION_REQUIRED",
                "Are you sure you want to clear all resume data? This action cannot be undone. \
                 Repeat the request with confirm=true."
                    .to_string(),
            ),
            AppError::Export(ExportError::InProgress) => (
                StatusCode::CONFLICT,
                "EXPORT_IN_PROGRESS",
                ExportError::InProgress.to_string(),
            ),
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    EXPORT_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    GENERIC_RETRY_MESSAGE.to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let AppError::Validation(fields) = &self {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::form::attachment::AttachmentError;
use crate::generator::GeneratorError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Malformed form data ({status}): {message}")]
    Multipart { status: StatusCode, message: String },

    #[error("Attachment error: {0}")]
    Attachment(#[from] AttachmentError),

    #[error("Generator error: {0}")]
    Generator(GeneratorError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Multipart {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<GeneratorError> for AppError {
    fn from(e: GeneratorError) -> Self {
        match e {
            GeneratorError::NotFound(id) => AppError::NotFound(format!("Package {id} not found")),
            other => AppError::Generator(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Multipart { status, message } => {
                let code = match *status {
                    StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
                    s if s.is_client_error() => "BAD_REQUEST",
                    _ => "MULTIPART_ERROR",
                };
                (*status, code, message.clone())
            }
            AppError::Attachment(e @ AttachmentError::TooLarge { .. }) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PHOTO_TOO_LARGE",
                e.to_string(),
            ),
            AppError::Attachment(e) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                e.to_string(),
            ),
            AppError::Generator(GeneratorError::Rejected { status, message }) => {
                tracing::error!("Generator rejected submission ({status}): {message}");
                (StatusCode::BAD_GATEWAY, "GENERATOR_ERROR", message.clone())
            }
            AppError::Generator(e) => {
                tracing::error!("Generator error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATOR_UNAVAILABLE",
                    "The document service could not be reached".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

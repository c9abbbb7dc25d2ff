use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::Field;
use serde_json::json;
use thiserror::Error;

/// Every way a request can fail. Each variant becomes a `{"error": ...}` body;
/// nothing escapes a handler as an unhandled fault.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required fields: {0:?}")]
    MissingField(Vec<Field>),
    #[error("Invalid image: {0}")]
    InvalidFile(String),
    #[error("Invalid field format: {0}")]
    InvalidFormat(String),
    #[error("Image upload failed: {0}")]
    Upload(#[from] image_store::UploadError),
    #[error("Database error: {0}")]
    Persistence(#[from] database::DbError),
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::MissingField(fields) => {
                tracing::debug!(?fields, "Submission is missing fields.");
                (StatusCode::BAD_REQUEST, "All fields are required".to_string())
            }
            AppError::InvalidFile(message) | AppError::InvalidFormat(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Upload(upload_err) => {
                tracing::error!(error = ?upload_err, "Image upload error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to upload image. Please try again.".to_string(),
                )
            }
            AppError::Persistence(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Multipart(multipart_err) => {
                tracing::warn!(error = %multipart_err, "Rejected multipart body.");
                (multipart_err.status(), multipart_err.body_text())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

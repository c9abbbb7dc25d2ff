use crate::{AppState, error::AppError, submission::Submission};
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use core_types::{School, describe_limit, is_valid_contact, is_valid_email, validate_school};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSchool {
    pub message: String,
    pub id: i64,
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct SchoolList {
    pub schools: Vec<School>,
}

/// # POST /api/schools
///
/// Checks run cheapest first and all of them finish before the image store or
/// the database is touched.
pub async fn create_school(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedSchool>), AppError> {
    let Submission { form, mut uploads } = Submission::read(multipart).await?;

    let missing = form.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::MissingField(missing));
    }

    if uploads.len() != 1 {
        return Err(AppError::InvalidFile("Exactly one image must be attached.".to_string()));
    }
    let upload = uploads.remove(0);
    if !state.images.validate_type(&upload.file) {
        return Err(AppError::InvalidFile(
            "Invalid file type. Only JPEG, JPG, PNG, and WebP are allowed.".to_string(),
        ));
    }
    if !state.images.validate_size(&upload.file, state.max_image_bytes) {
        return Err(AppError::InvalidFile(format!(
            "File size too large. Maximum size is {}.",
            describe_limit(state.max_image_bytes)
        )));
    }

    if !is_valid_email(form.email_id.trim()) {
        return Err(AppError::InvalidFormat("Invalid email format".to_string()));
    }
    if !is_valid_contact(form.contact.trim()) {
        return Err(AppError::InvalidFormat(
            "Contact number must be exactly 10 digits".to_string(),
        ));
    }

    let record = validate_school(&form, state.max_image_bytes).map_err(|errors| {
        let message = errors
            .first()
            .map(|(_, message)| message.to_string())
            .unwrap_or_else(|| "Invalid submission".to_string());
        AppError::InvalidFormat(message)
    })?;

    let image_url = state.images.store(&upload).await?;

    let id = match state.repo.insert_school(&record.with_image(image_url.clone())).await {
        Ok(id) => id,
        Err(db_err) => {
            // The row never landed, so the stored image is unreferenced.
            if let Err(cleanup_err) = state.images.remove(&image_url).await {
                tracing::warn!(error = ?cleanup_err, image_location = %image_url, "Could not remove orphaned image.");
            }
            return Err(db_err.into());
        }
    };

    tracing::info!(school_id = id, image_location = %image_url, "School added.");
    Ok((
        StatusCode::CREATED,
        Json(CreatedSchool {
            message: "School added successfully!".to_string(),
            id,
            image_url,
        }),
    ))
}

/// # GET /api/schools
/// Every stored school, in insertion order.
pub async fn list_schools(State(state): State<Arc<AppState>>) -> Result<Json<SchoolList>, AppError> {
    let schools = state.repo.all_schools().await?;
    Ok(Json(SchoolList { schools }))
}

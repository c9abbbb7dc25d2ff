use crate::error::AppError;
use axum::extract::Multipart;
use core_types::{Field, SchoolForm};
use image_store::ImageUpload;

/// A decoded `POST /api/schools` body.
#[derive(Debug, Default)]
pub struct Submission {
    pub form: SchoolForm,
    pub uploads: Vec<ImageUpload>,
}

impl Submission {
    /// Reads every part of the body. Unknown parts are skipped, the first
    /// value of a repeated text field wins, and a file part with neither a
    /// name nor any bytes (what a browser sends for an empty file input) is
    /// treated as absent.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut submission = Submission::default();
        let mut seen: Vec<Field> = Vec::new();

        while let Some(field) = multipart.next_field().await? {
            let Some(kind) = field.name().and_then(Field::from_name) else {
                continue;
            };

            if kind == Field::Image {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                submission
                    .uploads
                    .push(ImageUpload::new(file_name, mime_type, bytes.to_vec()));
                continue;
            }

            let value = field.text().await?;
            if seen.contains(&kind) {
                continue;
            }
            seen.push(kind);
            submission.set_text(kind, value);
        }

        submission.form.images = submission.uploads.iter().map(|u| u.file.clone()).collect();
        Ok(submission)
    }

    fn set_text(&mut self, field: Field, value: String) {
        let form = &mut self.form;
        let slot = match field {
            Field::Name => &mut form.name,
            Field::Address => &mut form.address,
            Field::City => &mut form.city,
            Field::State => &mut form.state,
            Field::Contact => &mut form.contact,
            Field::EmailId => &mut form.email_id,
            Field::Image => return,
        };
        *slot = value;
    }
}

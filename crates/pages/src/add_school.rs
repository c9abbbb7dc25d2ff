use api_client::{ApiError, CreatedSchool, ImageAttachment, SchoolSubmission, SchoolsApi};
use core_types::{Field, FieldErrors, MAX_IMAGE_BYTES, SchoolForm, describe_limit, validate_school};
use std::fmt::Write as _;

pub const SUCCESS_MESSAGE: &str = "School added successfully!";
pub const FALLBACK_ERROR: &str = "Failed to add school";
pub const NETWORK_ERROR: &str = "Network error. Please try again.";

/// What the user has typed and picked so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub email_id: String,
    pub image: Option<ImageAttachment>,
}

impl FormValues {
    fn slot(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.name),
            Field::Address => Some(&mut self.address),
            Field::City => Some(&mut self.city),
            Field::State => Some(&mut self.state),
            Field::Contact => Some(&mut self.contact),
            Field::EmailId => Some(&mut self.email_id),
            Field::Image => None,
        }
    }

    fn to_form(&self) -> SchoolForm {
        SchoolForm {
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            contact: self.contact.clone(),
            email_id: self.email_id.clone(),
            images: self.image.iter().map(ImageAttachment::meta).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success(String),
    Error(String),
}

/// The add-school form.
#[derive(Debug, Clone)]
pub struct AddSchoolPage {
    values: FormValues,
    field_errors: FieldErrors,
    status: SubmitStatus,
}

impl Default for AddSchoolPage {
    fn default() -> Self {
        Self::new()
    }
}

impl AddSchoolPage {
    pub fn new() -> Self {
        Self {
            values: FormValues::default(),
            field_errors: FieldErrors::new(),
            status: SubmitStatus::Idle,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// The submit control is disabled while a request is in flight.
    pub fn can_submit(&self) -> bool {
        self.status != SubmitStatus::Submitting
    }

    /// Sets a text field. Ignored for `Field::Image`; use `attach_image`.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        if let Some(slot) = self.values.slot(field) {
            *slot = value.into();
        }
    }

    pub fn attach_image(&mut self, image: ImageAttachment) {
        self.values.image = Some(image);
    }

    /// `Selected: front.jpg (200 KB)` once a file is picked.
    pub fn selected_image_summary(&self) -> Option<String> {
        self.values.image.as_ref().map(|image| {
            let meta = image.meta();
            format!("Selected: {} ({} KB)", meta.file_name, meta.size_kb())
        })
    }

    /// Starts an attempt: validates and, if everything passes, moves to
    /// `Submitting` and returns the request to send.
    ///
    /// On validation failure the field errors are recorded and the page stays
    /// `Idle`. Returns `None` as well while a request is already in flight.
    pub fn begin_submit(&mut self) -> Option<SchoolSubmission> {
        if !self.can_submit() {
            return None;
        }
        self.status = SubmitStatus::Idle;

        let record = match validate_school(&self.values.to_form(), MAX_IMAGE_BYTES) {
            Ok(record) => record,
            Err(errors) => {
                tracing::debug!(failed = errors.len(), "Form validation failed.");
                self.field_errors = errors;
                return None;
            }
        };
        // Validation guarantees exactly one attachment.
        let image = self.values.image.clone()?;

        self.field_errors = FieldErrors::new();
        self.status = SubmitStatus::Submitting;
        Some(SchoolSubmission {
            name: record.name,
            address: record.address,
            city: record.city,
            state: record.state,
            contact: record.contact,
            email_id: record.email_id,
            image,
        })
    }

    /// Applies the outcome of the request started by `begin_submit`.
    ///
    /// Success clears the form; any failure keeps what was entered.
    pub fn finish_submit(&mut self, outcome: Result<CreatedSchool, ApiError>) {
        self.status = match outcome {
            Ok(created) => {
                tracing::info!(school_id = created.id, "School submitted.");
                self.values = FormValues::default();
                SubmitStatus::Success(SUCCESS_MESSAGE.to_string())
            }
            Err(ApiError::Rejected { message, .. }) => {
                SubmitStatus::Error(message.unwrap_or_else(|| FALLBACK_ERROR.to_string()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Submission did not reach the server.");
                SubmitStatus::Error(NETWORK_ERROR.to_string())
            }
        };
    }

    /// Validates, sends, and records the outcome in one step.
    pub async fn submit(&mut self, api: &dyn SchoolsApi) -> &SubmitStatus {
        if let Some(submission) = self.begin_submit() {
            let outcome = api.create_school(submission).await;
            self.finish_submit(outcome);
        }
        &self.status
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Add New School");
        let _ = writeln!(out, "Fill in the information below to register a new school");
        let _ = writeln!(out);

        match &self.status {
            SubmitStatus::Success(message) => {
                let _ = writeln!(out, "[ok] {message}\n");
            }
            SubmitStatus::Error(message) => {
                let _ = writeln!(out, "[error] {message}\n");
            }
            SubmitStatus::Idle | SubmitStatus::Submitting => {}
        }

        for field in Field::ALL {
            let value = match field {
                Field::Image => self.selected_image_summary().unwrap_or_default(),
                _ => self.values.to_form().text(field).unwrap_or_default().to_string(),
            };
            let _ = writeln!(out, "{} *: {}", field.label(), value);
            if let Some(error) = self.field_errors.get(field) {
                let _ = writeln!(out, "    ! {error}");
            }
        }
        let _ = writeln!(
            out,
            "Supported formats: JPEG, JPG, PNG, WebP. Max size: {}",
            describe_limit(MAX_IMAGE_BYTES)
        );

        let button = if self.can_submit() { "[ Add School ]" } else { "[ Adding School... ]" };
        let _ = writeln!(out, "\n{button}");
        out
    }
}

use async_trait::async_trait;
use core_types::{ImageFile, School};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

pub mod error;
pub mod responses;

// --- Public API ---
pub use error::ApiError;
pub use responses::{ApiErrorResponse, CreatedSchool, SchoolList};

/// An image picked on the client, bytes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// The metadata the validation schema looks at.
    pub fn meta(&self) -> ImageFile {
        ImageFile::new(self.file_name.clone(), self.mime_type.clone(), self.bytes.len() as u64)
    }
}

/// Everything `POST /api/schools` takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolSubmission {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub email_id: String,
    pub image: ImageAttachment,
}

impl SchoolSubmission {
    fn into_form(self) -> Result<Form, ApiError> {
        let image = Part::bytes(self.image.bytes)
            .file_name(self.image.file_name)
            .mime_str(&self.image.mime_type)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        Ok(Form::new()
            .text("name", self.name)
            .text("address", self.address)
            .text("city", self.city)
            .text("state", self.state)
            .text("contact", self.contact)
            .text("email_id", self.email_id)
            .part("image", image))
    }
}

/// The client-side view of the school registry API.
///
/// The pages depend on this trait only, so they can be driven by the HTTP
/// client or by a scripted stand-in.
#[async_trait]
pub trait SchoolsApi: Send + Sync {
    /// Submits a new school. Sends a multipart body with the image attached.
    async fn create_school(&self, submission: SchoolSubmission) -> Result<CreatedSchool, ApiError>;

    /// Fetches every registered school.
    async fn list_schools(&self) -> Result<Vec<School>, ApiError>;
}

/// A concrete implementation of `SchoolsApi` over HTTP.
#[derive(Clone)]
pub struct HttpSchoolsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSchoolsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn schools_url(&self) -> String {
        format!("{}/api/schools", self.base_url)
    }

    /// Reads a response body, turning non-success statuses into
    /// `ApiError::Rejected` with the server's `error` text when it sent one.
    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .ok()
                .map(|body| body.error);
            Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl SchoolsApi for HttpSchoolsClient {
    async fn create_school(&self, submission: SchoolSubmission) -> Result<CreatedSchool, ApiError> {
        let form = submission.into_form()?;
        let response = self.client.post(self.schools_url()).multipart(form).send().await?;
        let created = Self::read::<CreatedSchool>(response).await?;
        tracing::debug!(school_id = created.id, "School created.");
        Ok(created)
    }

    async fn list_schools(&self) -> Result<Vec<School>, ApiError> {
        let response = self.client.get(self.schools_url()).send().await?;
        let list = Self::read::<SchoolList>(response).await?;
        Ok(list.schools)
    }
}

use crate::error::UploadError;
use crate::signing::sign_params;
use crate::{ImageStore, ImageUpload};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use configuration::CloudinarySettings;
use regex::Regex;
use reqwest::multipart::Form;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Resize to fit 800x600, then let the host pick quality and delivery format.
pub const UPLOAD_TRANSFORMATION: &str = "c_limit,h_600,w_800/q_auto/f_auto";

static PUBLIC_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/v\d+/(.+)\.").expect("public id pattern is valid"));

/// Successful reply of the upload endpoint. Only the fields we use.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Uploads images to a Cloudinary-compatible asset host.
#[derive(Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

impl CloudinaryStore {
    pub fn new(settings: &CloudinarySettings) -> Result<Self, UploadError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cloud_name: settings.cloud_name.clone(),
            api_key: settings.api_key.clone(),
            api_secret: settings.api_secret.clone(),
            folder: settings.folder.clone(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/v1_1/{}/image/{}", self.base_url, self.cloud_name, action)
    }

    /// Adds `api_key`, `signature` and `signature_algorithm` to `params` and
    /// turns them into a multipart form.
    fn signed_form(&self, mut params: BTreeMap<&'static str, String>) -> Form {
        let signature = sign_params(&params, &self.api_secret);
        params.insert("api_key", self.api_key.clone());
        params.insert("signature", signature);
        params.insert("signature_algorithm", "sha256".to_string());

        params
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
    }

    async fn post<T: for<'de> Deserialize<'de>>(&self, action: &str, form: Form) -> Result<T, UploadError> {
        let response = self.client.post(self.endpoint(action)).multipart(form).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text)
                .map_err(|e| UploadError::Rejected(format!("unreadable response: {e}")))
        } else {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}: {text}"));
            Err(UploadError::Rejected(message))
        }
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn store(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        let data_uri = format!(
            "data:{};base64,{}",
            upload.file.mime_type,
            STANDARD.encode(&upload.bytes)
        );

        let mut params = BTreeMap::new();
        params.insert("folder", self.folder.clone());
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        params.insert("transformation", UPLOAD_TRANSFORMATION.to_string());

        let form = self.signed_form(params).text("file", data_uri);
        let result = self.post::<UploadResponse>("upload", form).await;

        match result {
            Ok(UploadResponse { secure_url: Some(url), public_id }) => {
                tracing::info!(public_id = ?public_id, bytes = upload.bytes.len(), "Image uploaded to asset host.");
                Ok(url)
            }
            Ok(_) => Err(UploadError::EmptyResult),
            Err(e) => {
                tracing::error!(error = ?e, file = %upload.file.file_name, "Asset host upload failed.");
                Err(e)
            }
        }
    }

    async fn remove(&self, location: &str) -> Result<(), UploadError> {
        let public_id = extract_public_id(location)
            .ok_or_else(|| UploadError::UnknownLocation(location.to_string()))?;

        let mut params = BTreeMap::new();
        params.insert("public_id", public_id);
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());

        let response = self.post::<DestroyResponse>("destroy", self.signed_form(params)).await?;
        if response.result != "ok" {
            return Err(UploadError::Rejected(format!("destroy returned {}", response.result)));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "cloudinary"
    }
}

/// Pulls the public id out of a delivery URL such as
/// `https://res.cloudinary.com/demo/image/upload/v1712/school-management/schools/abc.jpg`.
pub fn extract_public_id(url: &str) -> Option<String> {
    PUBLIC_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

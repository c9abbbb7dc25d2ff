//! # Image Store
//!
//! Persists uploaded school images and hands back a location string that is
//! stored with the record. Two implementations share the [`ImageStore`]
//! interface and are picked from configuration:
//!
//! - [`CloudinaryStore`] sends the image to a Cloudinary-compatible asset host
//!   and returns the permanent `secure_url`.
//! - [`LocalStore`] writes the file below a local directory and returns a
//!   relative path such as `/uploads/1717243200000-front.jpg`.

use async_trait::async_trait;
use configuration::{ImageBackend, ImageSettings};
use core_types::ImageFile;
use std::sync::Arc;

pub mod cloudinary;
pub mod error;
pub mod local;
mod signing;

// --- Public API ---
pub use cloudinary::{CloudinaryStore, extract_public_id};
pub use error::UploadError;
pub use local::LocalStore;

/// An image received from a client: its metadata plus the raw bytes.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file: ImageFile,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file = ImageFile::new(file_name, mime_type, bytes.len() as u64);
        Self { file, bytes }
    }
}

/// Checks the MIME type against the allow-list. The extension is ignored.
pub fn validate_type(file: &ImageFile) -> bool {
    core_types::is_allowed_image_type(&file.mime_type)
}

pub fn validate_size(file: &ImageFile, max_bytes: u64) -> bool {
    core_types::is_within_size(file, max_bytes)
}

/// The capability every image backend provides.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persists the image and returns where it can be fetched from.
    async fn store(&self, upload: &ImageUpload) -> Result<String, UploadError>;

    /// Deletes an image previously returned by `store`.
    async fn remove(&self, location: &str) -> Result<(), UploadError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    fn validate_type(&self, file: &ImageFile) -> bool {
        validate_type(file)
    }

    fn validate_size(&self, file: &ImageFile, max_bytes: u64) -> bool {
        validate_size(file, max_bytes)
    }
}

/// Builds the store selected by `images.backend`.
pub fn build_image_store(settings: &ImageSettings) -> Result<Arc<dyn ImageStore>, UploadError> {
    let store: Arc<dyn ImageStore> = match settings.backend {
        ImageBackend::Cloudinary => Arc::new(CloudinaryStore::new(&settings.cloudinary)?),
        ImageBackend::Local => Arc::new(LocalStore::new(
            settings.local.directory.clone(),
            settings.local.public_prefix.clone(),
        )),
    };
    tracing::info!(backend = store.backend_name(), "Image store ready.");
    Ok(store)
}

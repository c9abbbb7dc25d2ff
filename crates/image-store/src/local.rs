use crate::error::UploadError;
use crate::{ImageStore, ImageUpload};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Gives up after this many name collisions within the same millisecond.
const MAX_NAME_ATTEMPTS: u32 = 16;

/// Writes images below `directory` and returns `<public_prefix>/<file name>`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    directory: PathBuf,
    public_prefix: String,
}

impl LocalStore {
    pub fn new(directory: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    fn location_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }
}

/// Writes `bytes` to a freshly created file at `path`. On failure the
/// partial file is removed before the error is returned.
async fn write_or_discard<W>(file: &mut W, path: &Path, bytes: &[u8]) -> Result<(), UploadError>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(bytes).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        if let Err(cleanup_err) = fs::remove_file(path).await {
            tracing::warn!(error = %cleanup_err, path = %path.display(), "Could not remove partial image file.");
        }
        return Err(e.into());
    }
    Ok(())
}

/// Reduces a client-supplied name to its last path segment, made of
/// `[A-Za-z0-9._-]` only.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    if cleaned.trim_matches(['.', '_']).is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl ImageStore for LocalStore {
    async fn store(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        fs::create_dir_all(&self.directory).await?;

        let stem = format!(
            "{}-{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_file_name(&upload.file.file_name)
        );

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 { stem.clone() } else { format!("{attempt}-{stem}") };
            let path = self.directory.join(&name);

            let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            write_or_discard(&mut file, &path, &upload.bytes).await?;

            tracing::info!(path = %path.display(), bytes = upload.bytes.len(), "Image written to disk.");
            return Ok(self.location_for(&name));
        }

        Err(UploadError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free file name for {stem}"),
        )))
    }

    async fn remove(&self, location: &str) -> Result<(), UploadError> {
        let name = location
            .strip_prefix(&self.public_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .ok_or_else(|| UploadError::UnknownLocation(location.to_string()))?;

        fs::remove_file(self.directory.join(name)).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `schools` table. This is the read shape: every column is
/// populated, only `image` may be absent.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub image: Option<String>,
    pub email_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The write shape of a school. The id and both timestamps are assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSchool {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub email_id: String,
    pub image: Option<String>,
}

impl NewSchool {
    /// Attaches the location returned by the image store.
    pub fn with_image(mut self, location: impl Into<String>) -> Self {
        self.image = Some(location.into());
        self
    }
}

/// Metadata of an attached image file.
///
/// Validation only ever looks at these three values; the bytes travel
/// separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Size rounded to whole kilobytes, as the form displays it.
    pub fn size_kb(&self) -> u64 {
        (self.size_bytes + 512) / 1024
    }
}

use crate::AddSchoolPage;
use api_client::{ApiError, CreatedSchool, ImageAttachment, SchoolSubmission, SchoolsApi};
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Field, School};
use std::sync::Mutex;

enum Reply {
    Accept,
    Reject(u16, Option<String>),
    Unreachable,
}

/// A `SchoolsApi` that answers from a script and records what it was sent.
pub struct ScriptedApi {
    reply: Reply,
    schools: Mutex<Vec<School>>,
    sent: Mutex<Vec<SchoolSubmission>>,
    list_calls: Mutex<usize>,
    fail_lists: Mutex<usize>,
}

impl ScriptedApi {
    fn with(reply: Reply) -> Self {
        Self {
            reply,
            schools: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
            fail_lists: Mutex::new(0),
        }
    }

    pub fn accepting() -> Self {
        Self::with(Reply::Accept)
    }

    pub fn rejecting(status: u16, message: Option<&str>) -> Self {
        Self::with(Reply::Reject(status, message.map(str::to_string)))
    }

    pub fn unreachable() -> Self {
        Self::with(Reply::Unreachable)
    }

    /// The next `n` list calls fail as per the reply script.
    pub fn failing_lists(self, n: usize) -> Self {
        *self.fail_lists.lock().unwrap() = n;
        self
    }

    pub fn with_schools(self, schools: Vec<School>) -> Self {
        *self.schools.lock().unwrap() = schools;
        self
    }

    pub fn submissions(&self) -> Vec<SchoolSubmission> {
        self.sent.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    fn failure(&self) -> ApiError {
        match &self.reply {
            Reply::Reject(status, message) => ApiError::Rejected {
                status: *status,
                message: message.clone(),
            },
            _ => ApiError::Deserialization("connection reset".to_string()),
        }
    }
}

#[async_trait]
impl SchoolsApi for ScriptedApi {
    async fn create_school(&self, submission: SchoolSubmission) -> Result<CreatedSchool, ApiError> {
        if !matches!(self.reply, Reply::Accept) {
            return Err(self.failure());
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(submission);
        Ok(CreatedSchool {
            message: "School added successfully!".to_string(),
            id: sent.len() as i64,
            image_url: format!("/uploads/{}.jpg", sent.len()),
        })
    }

    async fn list_schools(&self) -> Result<Vec<School>, ApiError> {
        *self.list_calls.lock().unwrap() += 1;
        let mut remaining = self.fail_lists.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(self.failure());
        }
        Ok(self.schools.lock().unwrap().clone())
    }
}

pub fn school(id: i64, name: &str, image: Option<&str>) -> School {
    let now = Utc::now();
    School {
        id,
        name: name.to_string(),
        address: "123 Main St, Springfield".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        contact: "5551234567".to_string(),
        image: image.map(str::to_string),
        email_id: "admin@lincoln.edu".to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn lincoln_page() -> AddSchoolPage {
    let mut page = AddSchoolPage::new();
    page.set(Field::Name, "Lincoln High");
    page.set(Field::Address, "123 Main St, Springfield");
    page.set(Field::City, "Springfield");
    page.set(Field::State, "IL");
    page.set(Field::Contact, "5551234567");
    page.set(Field::EmailId, "admin@lincoln.edu");
    page.attach_image(ImageAttachment::new("front.jpg", "image/jpeg", vec![0xFF; 200 * 1024]));
    page
}

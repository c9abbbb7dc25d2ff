use crate::{DbError, SchoolRepository};
use async_trait::async_trait;
use chrono::Utc;
use core_types::{NewSchool, School};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// A process-local school store with the same contract as the PostgreSQL one.
///
/// Ids start at 1 and grow by one per insert. `set_available(false)` makes
/// every call fail the way a lost database connection would.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    rows: Mutex<Vec<School>>,
    unavailable: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), DbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("connection lost".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SchoolRepository for MemoryRepository {
    async fn insert_school(&self, school: &NewSchool) -> Result<i64, DbError> {
        self.check_available()?;
        if !core_types::is_valid_contact(&school.contact) {
            // Mirrors the `schools_contact_digits` check constraint.
            return Err(DbError::ConstraintViolation(format!(
                "contact {:?} violates schools_contact_digits",
                school.contact
            )));
        }

        let mut rows = self.rows.lock().await;
        let id = rows.last().map_or(1, |row| row.id + 1);
        let now = Utc::now();
        rows.push(School {
            id,
            name: school.name.clone(),
            address: school.address.clone(),
            city: school.city.clone(),
            state: school.state.clone(),
            contact: school.contact.clone(),
            image: school.image.clone(),
            email_id: school.email_id.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn all_schools(&self) -> Result<Vec<School>, DbError> {
        self.check_available()?;
        Ok(self.rows.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(name: &str) -> NewSchool {
        NewSchool {
            name: name.to_string(),
            address: "123 Main St, Springfield".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            contact: "5551234567".to_string(),
            email_id: "admin@lincoln.edu".to_string(),
            image: Some("/uploads/1-front.jpg".to_string()),
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids_and_keeps_insertion_order() {
        let repo = MemoryRepository::new();
        let first = repo.insert_school(&school("Lincoln High")).await.unwrap();
        let second = repo.insert_school(&school("Jefferson Middle")).await.unwrap();
        assert_eq!((first, second), (1, 2));

        let all = repo.all_schools().await.unwrap();
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Lincoln High", "Jefferson Middle"]);
        assert_eq!(all[0].created_at, all[0].updated_at);
        assert_eq!(all[0].image.as_deref(), Some("/uploads/1-front.jpg"));
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let repo = MemoryRepository::new();
        repo.set_available(false);
        assert!(matches!(
            repo.insert_school(&school("Lincoln High")).await,
            Err(DbError::Unavailable(_))
        ));
        assert!(repo.all_schools().await.is_err());

        repo.set_available(true);
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn rejects_contacts_the_table_would_reject() {
        let repo = MemoryRepository::new();
        let mut bad = school("Lincoln High");
        bad.contact = "555-123".to_string();
        assert!(repo.insert_school(&bad).await.is_err());
        assert_eq!(repo.len().await, 0);
    }
}

use crate::DbError;
use async_trait::async_trait;
use core_types::{NewSchool, School};
use sqlx::postgres::PgPool;

/// The storage contract the HTTP handlers depend on.
///
/// Handlers receive an `Arc<dyn SchoolRepository>` through application state,
/// so the PostgreSQL store and the in-memory store are interchangeable.
#[async_trait]
pub trait SchoolRepository: Send + Sync {
    /// Inserts a new school and returns its server-assigned id.
    async fn insert_school(&self, school: &NewSchool) -> Result<i64, DbError>;

    /// Returns every stored school in insertion order.
    async fn all_schools(&self) -> Result<Vec<School>, DbError>;

    /// Releases the underlying connections. The repository must not be used
    /// afterwards.
    async fn close(&self) {}
}

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchoolRepository for DbRepository {
    async fn insert_school(&self, school: &NewSchool) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO schools (name, address, city, state, contact, image, email_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&school.name)
        .bind(&school.address)
        .bind(&school.city)
        .bind(&school.state)
        .bind(&school.contact)
        .bind(&school.image)
        .bind(&school.email_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(school_id = id, "School row inserted.");
        Ok(id)
    }

    /// No pagination: the listing returns the whole table.
    async fn all_schools(&self) -> Result<Vec<School>, DbError> {
        let schools = sqlx::query_as::<_, School>(
            r#"
            SELECT id, name, address, city, state, contact, image, email_id, created_at, updated_at
            FROM schools
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(schools)
    }

    async fn close(&self) {
        crate::connection::close(&self.pool).await;
    }
}

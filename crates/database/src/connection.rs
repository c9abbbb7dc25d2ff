use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The URL comes from `database.url`, which settings loading fills from
/// `DATABASE_URL` when the file leaves it out. The pool is opened once at
/// process start and handed to the repository; nothing else holds it.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let database_url = settings
        .url
        .as_deref()
        .ok_or_else(|| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(database_url)
        .await?;

    tracing::info!(max_connections = settings.max_connections, "Database pool established.");
    Ok(pool)
}

/// Applies the embedded migrations so the `schools` table exists before the
/// first request is served.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Closes every connection in the pool. Called once at shutdown.
pub async fn close(pool: &PgPool) {
    pool.close().await;
    tracing::info!("Database pool closed.");
}

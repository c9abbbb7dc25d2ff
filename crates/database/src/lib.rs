//! # School Registry Database Crate
//!
//! This crate is the only writer of school records. It hides the SQL behind
//! the [`SchoolRepository`] trait so the web server never touches a query.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations` / `close`: the lifecycle of the PostgreSQL pool.
//! - `DbRepository`: the PostgreSQL implementation of `SchoolRepository`.
//! - `MemoryRepository`: an in-process implementation with the same contract,
//!   used by tests and by the `memory` backend.
//! - `open_repository`: builds whichever implementation the settings select.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;

use configuration::{DatabaseBackend, DatabaseSettings};
use std::sync::Arc;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{close, connect, run_migrations};
pub use error::DbError;
pub use memory::MemoryRepository;
pub use repository::{DbRepository, SchoolRepository};

/// Opens the configured store. For PostgreSQL this connects and migrates.
pub async fn open_repository(settings: &DatabaseSettings) -> Result<Arc<dyn SchoolRepository>, DbError> {
    match settings.backend {
        DatabaseBackend::Postgres => {
            let pool = connect(settings).await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(DbRepository::new(pool)))
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using the in-memory school store; records are lost on exit.");
            Ok(Arc::new(MemoryRepository::new()))
        }
    }
}

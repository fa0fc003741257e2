//! Database module
//!
//! This module handles the document store backends, migrations, and repositories.

pub mod connection;
pub mod document;
pub mod memory;
pub mod postgres;
pub mod repositories;

use sqlx::PgPool;

pub use connection::*;
pub use document::{
    Direction, Document, DocumentStore, Predicate, Query, StoreError, StoreResult, Versioned,
};
pub use memory::InMemoryStore;
pub use postgres::PgDocumentStore;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

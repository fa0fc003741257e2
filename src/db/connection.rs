//! Database connection management

use std::sync::Arc;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::{StoreBackend, StoreConfig};

use super::{DocumentStore, InMemoryStore, PgDocumentStore};

/// Create a new database connection pool
pub async fn create_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// Test database connection
pub async fn test_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Build the configured document store, running migrations for Postgres.
pub async fn connect_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match &config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory document store; data is lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::Postgres {
            url,
            max_connections,
        } => {
            tracing::info!("Connecting to database...");
            let pool = create_pool(url, *max_connections).await?;
            test_connection(&pool).await?;

            tracing::info!("Running database migrations...");
            super::run_migrations(&pool).await?;

            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
    }
}

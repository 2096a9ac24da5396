//! Embedded schema migrations.
//!
//! Diesel's migration harness needs a synchronous connection, so migrations
//! run on a blocking thread before the pool is handed to the adapters.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::StorageError;

/// Migrations compiled into the binary from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn run_blocking(database_url: &str) -> Result<usize, StorageError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| StorageError::connection(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| StorageError::query(format!("migration failed: {err}")))?;
    Ok(applied.len())
}

/// Apply every pending migration to the database at `database_url`.
///
/// # Errors
///
/// Returns [`StorageError::Connection`] when the database cannot be reached
/// and [`StorageError::Query`] when a migration fails.
pub async fn run_migrations(database_url: &str) -> Result<(), StorageError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_blocking(&url))
        .await
        .map_err(|err| StorageError::query(format!("migration task failed: {err}")))??;
    info!(applied, "database migrations applied");
    Ok(())
}

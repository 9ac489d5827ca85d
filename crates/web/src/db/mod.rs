//! Database operations for the classifieds `SQLite` store.
//!
//! ## Tables
//!
//! - `accounts` - Registered users (unique username and email)
//! - `listings` - Ads, each owned by one account
//! - `tower_sessions` - Session storage (created by the session store itself)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/`, embedded at compile time,
//! and run on server startup or via:
//! ```bash
//! cargo run -p classifieds-cli -- migrate
//! ```

pub mod accounts;
pub mod listings;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use accounts::AccountRepository;
pub use listings::ListingRepository;

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email). Carries the offending column.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign keys are enforced and the database file is created if missing.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a pool over a private in-memory database.
///
/// Every `SQLite` memory connection is its own database, so the pool holds
/// exactly one connection and never lets it expire.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be opened.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Apply the embedded schema migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Translate a unique-constraint violation into `RepositoryError::Conflict`.
///
/// `SQLite` reports these as `UNIQUE constraint failed: table.column`; the
/// column name is kept so callers can tell which value collided.
fn map_unique_violation(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        let column = db_err
            .message()
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .trim()
            .to_owned();
        return RepositoryError::Conflict(column);
    }
    RepositoryError::Database(err)
}

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::SqlitePool;

    /// In-memory pool with migrations applied.
    #[allow(clippy::expect_used)]
    pub async fn migrated_pool() -> SqlitePool {
        let pool = super::connect_in_memory()
            .await
            .expect("in-memory database should open");
        super::run_migrations(&pool)
            .await
            .expect("migrations should apply");
        pool
    }
}

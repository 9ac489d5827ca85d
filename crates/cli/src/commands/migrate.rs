//! Database migration command.
//!
//! Applies the migrations embedded in the web crate
//! (`crates/web/migrations/`). The web server also applies them on startup.

use classifieds_web::db;
use sqlx::SqlitePool;

use super::CliError;

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `CliError::Migration` if a migration fails.
pub async fn run(pool: &SqlitePool) -> Result<(), CliError> {
    tracing::info!("Running migrations...");
    db::run_migrations(pool).await?;
    tracing::info!("Migrations complete!");
    Ok(())
}

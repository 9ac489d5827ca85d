//! CLI subcommands.

pub mod account;
pub mod listing;
pub mod migrate;

use classifieds_web::config::{ConfigError, WebConfig};
use classifieds_web::db;
use classifieds_web::services::{AccountError, ListingError};
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Account(#[from] AccountError),

    #[error("{0}")]
    Listing(#[from] ListingError),
}

/// Open the database configured for the web server.
///
/// # Errors
///
/// Returns `CliError` if the configuration is invalid or the database cannot be opened.
pub async fn connect() -> Result<SqlitePool, CliError> {
    let config = WebConfig::from_env()?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.database_url).await?)
}

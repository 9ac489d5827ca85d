//! Web server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults suit a local development run.
//!
//! - `CLASSIFIEDS_DATABASE_URL` - `SQLite` connection string (falls back to `DATABASE_URL`,
//!   default: `sqlite://classifieds.db?mode=rwc`)
//! - `CLASSIFIEDS_HOST` - Bind address (default: 127.0.0.1)
//! - `CLASSIFIEDS_PORT` - Listen port (falls back to `PORT`, default: 5000)
//! - `CLASSIFIEDS_BASE_URL` - Public URL (default: `http://localhost:5000`).
//!   An `https` URL turns on `Secure` session cookies.
//! - `CLASSIFIEDS_STATIC_DIR` - Directory served under `/static`
//!   (default: `crates/web/static`, relative to the working directory)
//! - `CLASSIFIEDS_UPLOAD_DIR` - Directory for listing photos (default: `static/uploads`)
//! - `CLASSIFIEDS_MAX_UPLOAD_BYTES` - Largest accepted photo (default: 5 MiB)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_DATABASE_URL: &str = "sqlite://classifieds.db?mode=rwc";
const DEFAULT_STATIC_DIR: &str = "crates/web/static";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the board
    pub base_url: Url,
    /// Directory holding the stylesheet
    pub static_dir: PathBuf,
    /// Directory uploaded photos are written to and served from
    pub upload_dir: PathBuf,
    /// Largest accepted photo upload in bytes
    pub max_upload_bytes: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for values that fail to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(lookup);

        let database_url = env
            .first_of(&["CLASSIFIEDS_DATABASE_URL", "DATABASE_URL"])
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let host = env.parse_or("CLASSIFIEDS_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = match env.first_of(&["CLASSIFIEDS_PORT", "PORT"]) {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnvVar("CLASSIFIEDS_PORT".to_string(), e.to_string())
            })?,
            None => 5000,
        };
        let base_url = env.parse_or(
            "CLASSIFIEDS_BASE_URL",
            Url::parse("http://localhost:5000").map_err(|e| {
                ConfigError::InvalidEnvVar("CLASSIFIEDS_BASE_URL".to_string(), e.to_string())
            })?,
        )?;
        let static_dir = env
            .get("CLASSIFIEDS_STATIC_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from);
        let upload_dir = env
            .get("CLASSIFIEDS_UPLOAD_DIR")
            .map_or_else(|| PathBuf::from("static/uploads"), PathBuf::from);
        let max_upload_bytes =
            env.parse_or("CLASSIFIEDS_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            base_url,
            static_dir,
            upload_dir,
            max_upload_bytes,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    /// Get a variable, treating empty strings as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get the first variable that is set.
    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

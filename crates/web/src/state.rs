//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::WebConfig;
use crate::services::UploadStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the database pool,
/// and the photo upload store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    pool: SqlitePool,
    uploads: UploadStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The upload store is built from `config.upload_dir` and
    /// `config.max_upload_bytes`.
    #[must_use]
    pub fn new(config: WebConfig, pool: SqlitePool) -> Self {
        let uploads = UploadStore::new(config.upload_dir.clone(), config.max_upload_bytes);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                uploads,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the photo upload store.
    #[must_use]
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }
}

//! Photo uploads.
//!
//! Files land in a single flat directory under a sanitized, randomly prefixed
//! name. The stored name is what a listing records and what `/uploads/<name>`
//! serves.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use classifieds_core::PhotoName;

/// Name used when the client's filename sanitizes to nothing.
const FALLBACK_NAME: &str = "photo";

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file is larger than the configured limit.
    #[error("photo must be at most {max} bytes")]
    TooLarge { max: usize },

    /// Writing to the upload directory failed.
    #[error("upload I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Directory-backed store for listing photos.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    /// Create a store rooted at `dir` accepting files up to `max_bytes`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    /// The directory files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Largest accepted file, in bytes.
    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the upload directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if the directory cannot be created.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Store an uploaded file and return the name it was saved under.
    ///
    /// A file part with no filename or no content counts as "no photo" and
    /// returns `Ok(None)` without touching the disk.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::TooLarge` if `bytes` exceeds the limit.
    /// Returns `UploadError::Io` if the write fails.
    pub async fn store(
        &self,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<Option<PhotoName>, UploadError> {
        let Some(original_name) = original_name.filter(|n| !n.trim().is_empty()) else {
            return Ok(None);
        };
        if bytes.is_empty() {
            return Ok(None);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                max: self.max_bytes,
            });
        }

        let base = PhotoName::sanitize(original_name)
            .or_else(|| PhotoName::sanitize(FALLBACK_NAME))
            .unwrap_or_else(|| PhotoName::from_stored(FALLBACK_NAME.to_owned()));
        let name = base.with_prefix(&unique_token());

        tokio::fs::write(self.dir.join(name.as_str()), bytes).await?;

        tracing::debug!(photo = %name, size = bytes.len(), "Stored upload");
        Ok(Some(name))
    }

    /// Remove a stored photo. Failures are logged, not returned.
    pub async fn remove(&self, name: &PhotoName) {
        if let Err(e) = tokio::fs::remove_file(self.dir.join(name.as_str())).await {
            tracing::warn!(photo = %name, error = %e, "Failed to remove upload");
        }
    }
}

/// Public URL path a stored photo is served at.
#[must_use]
pub fn public_path(name: &PhotoName) -> String {
    format!("/uploads/{name}")
}

/// Eight hex characters of randomness.
fn unique_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(8);
    token
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store(max_bytes: usize) -> UploadStore {
        let dir = std::env::temp_dir().join(format!("classifieds-uploads-{}", Uuid::new_v4()));
        UploadStore::new(dir, max_bytes)
    }

    #[tokio::test]
    async fn test_store_writes_prefixed_sanitized_name() {
        let store = temp_store(1024);
        store.ensure_dir().await.unwrap();

        let name = store
            .store(Some("../my bike.png"), b"png-bytes")
            .await
            .unwrap()
            .unwrap();

        let (token, rest) = name.as_str().split_once('_').unwrap();
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(rest, "my_bike.png");

        let written = tokio::fs::read(store.dir().join(name.as_str())).await.unwrap();
        assert_eq!(written, b"png-bytes");

        tokio::fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_same_name_twice_does_not_collide() {
        let store = temp_store(1024);
        store.ensure_dir().await.unwrap();

        let first = store.store(Some("a.jpg"), b"1").await.unwrap().unwrap();
        let second = store.store(Some("a.jpg"), b"2").await.unwrap().unwrap();
        assert_ne!(first, second);

        tokio::fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_part_means_no_photo() {
        let store = temp_store(1024);

        assert!(store.store(None, b"data").await.unwrap().is_none());
        assert!(store.store(Some(""), b"data").await.unwrap().is_none());
        assert!(store.store(Some("a.png"), b"").await.unwrap().is_none());
        // Nothing was written, so the directory was never needed.
        assert!(!store.dir().exists());
    }

    #[tokio::test]
    async fn test_oversize_is_rejected() {
        let store = temp_store(4);

        let err = store.store(Some("a.png"), b"12345").await;
        assert!(matches!(err, Err(UploadError::TooLarge { max: 4 })));
    }

    #[tokio::test]
    async fn test_unusable_name_falls_back() {
        let store = temp_store(1024);
        store.ensure_dir().await.unwrap();

        let name = store.store(Some("???"), b"x").await.unwrap().unwrap();
        assert!(name.as_str().ends_with("_photo"));

        tokio::fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_deletes_file_and_tolerates_missing() {
        let store = temp_store(1024);
        store.ensure_dir().await.unwrap();
        let name = store.store(Some("a.png"), b"x").await.unwrap().unwrap();

        store.remove(&name).await;
        assert!(!store.dir().join(name.as_str()).exists());
        store.remove(&name).await;

        tokio::fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[test]
    fn test_public_path() {
        let name = PhotoName::sanitize("bike.png").unwrap();
        assert_eq!(public_path(&name), "/uploads/bike.png");
    }
}

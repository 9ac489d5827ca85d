//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>` for failures that cannot be
//! turned into a notice and a redirect. Server-side failures are captured to
//! Sentry before responding.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AccountError, ListingError, UploadError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Account operation failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Listing operation failed.
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    /// Storing an uploaded photo failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Reading or writing the session failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn is_internal(&self) -> bool {
        match self {
            Self::Database(_) | Self::Session(_) => true,
            Self::Account(err) => err.is_internal(),
            Self::Listing(err) => matches!(err, ListingError::Repository(_)),
            Self::Upload(err) => matches!(err, UploadError::Io(_)),
            Self::BadRequest(_) => false,
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        if self.is_internal() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        match self {
            Self::Account(err) => err.status(),
            Self::Listing(ListingError::NotFound) => StatusCode::NOT_FOUND,
            Self::Listing(ListingError::Forbidden) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.is_internal() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            _ if self.is_internal() => "Internal server error".to_owned(),
            Self::Account(err) => err.user_message(),
            Self::Listing(err) => err.to_string(),
            Self::Upload(err) => err.to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(account_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(account_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::Account(AccountError::DuplicateEmail)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Account(AccountError::InvalidPassword)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Listing(ListingError::Forbidden)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Listing(ListingError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Upload(UploadError::TooLarge { max: 1 })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::BadRequest("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "boom".to_owned()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn test_internal_details_are_hidden() {
        let response = AppError::Database(RepositoryError::DataCorruption(
            "secret path /var/db".to_owned(),
        ))
        .into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Internal server error");
    }
}

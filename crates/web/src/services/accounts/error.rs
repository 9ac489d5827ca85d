//! Account error types.

use axum::http::StatusCode;
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] classifieds_core::EmailError),

    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// Another account already uses this email.
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// Another account already uses this username.
    #[error("this username is already taken")]
    DuplicateUsername,

    /// No account has the given email (or ID).
    #[error("account not found")]
    AccountNotFound,

    /// The password does not match the stored credential.
    #[error("invalid password")]
    InvalidPassword,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AccountError {
    /// Whether this is an internal failure rather than a user-facing outcome.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::PasswordHash)
    }

    /// HTTP status used when a form is re-rendered with this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateEmail | Self::DuplicateUsername => StatusCode::CONFLICT,
            Self::AccountNotFound | Self::InvalidPassword => StatusCode::UNAUTHORIZED,
            Self::Repository(_) | Self::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(_) => "Please enter a valid email address.".to_owned(),
            Self::Validation(msg) => msg.clone(),
            Self::DuplicateEmail => "An account with this email already exists.".to_owned(),
            Self::DuplicateUsername => "This username is already taken.".to_owned(),
            Self::AccountNotFound => "No account uses this email. Please register.".to_owned(),
            Self::InvalidPassword => "Incorrect password. Please try again.".to_owned(),
            Self::Repository(_) | Self::PasswordHash => {
                "Something went wrong. Please try again.".to_owned()
            }
        }
    }
}

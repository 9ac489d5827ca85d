//! Account service.
//!
//! Registration and password login. Credentials are stored as Argon2id hashes.

mod error;

pub use error::AccountError;

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use sqlx::SqlitePool;

use classifieds_core::{AccountId, Email, Username};

use crate::db::{AccountRepository, RepositoryError};
use crate::models::Account;

/// Account service.
///
/// Handles registration and authentication.
pub struct AccountService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    /// Register a new account.
    ///
    /// Checks run in this order: required fields, email format, email
    /// uniqueness, username uniqueness. A duplicate that slips past the checks
    /// (two registrations racing) is still rejected by the store's unique
    /// constraints and reported the same way.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` if the username or password is missing.
    /// Returns `AccountError::InvalidEmail` if the email format is invalid.
    /// Returns `AccountError::DuplicateEmail` / `AccountError::DuplicateUsername`
    /// if either value is taken.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AccountError> {
        let username =
            Username::parse(username).map_err(|e| AccountError::Validation(capitalize(&e)))?;
        if password.is_empty() {
            return Err(AccountError::Validation("Password is required".to_owned()));
        }

        let email = Email::parse(email.trim())?;

        if self.accounts.get_by_email(&email).await?.is_some() {
            return Err(AccountError::DuplicateEmail);
        }
        if self.accounts.get_by_username(&username).await?.is_some() {
            return Err(AccountError::DuplicateUsername);
        }

        let password_hash = hash_password(password)?;

        let account = self
            .accounts
            .create(&username, &email, &password_hash)
            .await
            .map_err(duplicate_from_conflict)?;

        tracing::info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` if either field is blank.
    /// Returns `AccountError::AccountNotFound` if no account has this email.
    /// Returns `AccountError::InvalidPassword` if the password does not match.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AccountError::Validation("Email is required".to_owned()));
        }
        if password.is_empty() {
            return Err(AccountError::Validation("Password is required".to_owned()));
        }

        // A malformed address cannot belong to any account.
        let Ok(email) = Email::parse(email) else {
            return Err(AccountError::AccountNotFound);
        };

        let (account, password_hash) = self
            .accounts
            .get_password_hash(&email)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        verify_password(password, &password_hash)?;

        Ok(account)
    }

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::AccountNotFound` if the account doesn't exist.
    pub async fn get(&self, id: AccountId) -> Result<Account, AccountError> {
        self.accounts
            .get_by_id(id)
            .await?
            .ok_or(AccountError::AccountNotFound)
    }
}

/// Report a unique-constraint rejection as the matching duplicate error.
fn duplicate_from_conflict(err: RepositoryError) -> AccountError {
    match err {
        RepositoryError::Conflict(column) if column == "email" => AccountError::DuplicateEmail,
        RepositoryError::Conflict(column) if column == "username" => {
            AccountError::DuplicateUsername
        }
        other => AccountError::Repository(other),
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AccountError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AccountError::PasswordHash)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|e| match e {
            password_hash::Error::Password => AccountError::InvalidPassword,
            _ => AccountError::PasswordHash,
        })
}

/// Upper-case the first letter of an error message for display.
fn capitalize(err: &impl ToString) -> String {
    let message = err.to_string();
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

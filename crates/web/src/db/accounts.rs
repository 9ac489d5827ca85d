//! Account repository for database operations.
//!
//! Rows are read into private `FromRow` structs and converted into validated
//! domain types; anything that fails validation is reported as data corruption.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use classifieds_core::{AccountId, Email, Username};

use super::{RepositoryError, map_unique_violation};
use crate::models::Account;

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: AccountId,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            username,
            email,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    account: AccountRow,
    password_hash: String,
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, username, email, created_at
            FROM accounts
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    /// Get an account by its email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, username, email, created_at
            FROM accounts
            WHERE email = ?
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    /// Get an account by its username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, username, email, created_at
            FROM accounts
            WHERE username = ?
            ",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming the column (`email` or
    /// `username`) if either value is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        email: &Email,
        password_hash: &str,
    ) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO accounts (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, email, created_at
            ",
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(map_unique_violation)?;

        Account::try_from(row)
    }

    /// Get an account together with its password hash, by email.
    ///
    /// Returns `None` if no account has this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT id, username, email, created_at, password_hash
            FROM accounts
            WHERE email = ?
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let account = Account::try_from(row.account)?;
        Ok(Some((account, row.password_hash)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing::migrated_pool;

    fn alice() -> (Username, Email) {
        (
            Username::parse("alice").unwrap(),
            Email::parse("a@x.com").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = migrated_pool().await;
        let repo = AccountRepository::new(&pool);
        let (username, email) = alice();

        let created = repo.create(&username, &email, "hash").await.unwrap();
        assert_eq!(created.username, username);
        assert_eq!(created.email, email);

        let by_id = repo.get_by_id(created.id).await.unwrap().unwrap();
        let by_email = repo.get_by_email(&email).await.unwrap().unwrap();
        let by_username = repo.get_by_username(&username).await.unwrap().unwrap();
        assert_eq!(by_id, created);
        assert_eq!(by_email, created);
        assert_eq!(by_username, created);
    }

    #[tokio::test]
    async fn test_missing_account_is_none() {
        let pool = migrated_pool().await;
        let repo = AccountRepository::new(&pool);

        assert!(repo.get_by_id(AccountId::new(99)).await.unwrap().is_none());
        let email = Email::parse("nobody@x.com").unwrap();
        assert!(repo.get_by_email(&email).await.unwrap().is_none());
        assert!(repo.get_password_hash(&email).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_on_email_column() {
        let pool = migrated_pool().await;
        let repo = AccountRepository::new(&pool);
        let (username, email) = alice();
        repo.create(&username, &email, "hash").await.unwrap();

        let other = Username::parse("bob").unwrap();
        let err = repo.create(&other, &email, "hash").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(ref column) if column == "email"));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts_on_username_column() {
        let pool = migrated_pool().await;
        let repo = AccountRepository::new(&pool);
        let (username, email) = alice();
        repo.create(&username, &email, "hash").await.unwrap();

        let other = Email::parse("other@x.com").unwrap();
        let err = repo.create(&username, &other, "hash").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(ref column) if column == "username"));
    }

    #[tokio::test]
    async fn test_get_password_hash() {
        let pool = migrated_pool().await;
        let repo = AccountRepository::new(&pool);
        let (username, email) = alice();
        let created = repo.create(&username, &email, "stored-hash").await.unwrap();

        let (account, hash) = repo.get_password_hash(&email).await.unwrap().unwrap();
        assert_eq!(account.id, created.id);
        assert_eq!(hash, "stored-hash");
    }
}

//! Listing repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use classifieds_core::{AccountId, ListingId, PhotoName};

use super::RepositoryError;
use crate::models::{Listing, NewListing};

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: ListingId,
    owner_id: AccountId,
    title: String,
    description: String,
    contact: String,
    photo: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            contact: row.contact,
            photo: row.photo.map(PhotoName::from_stored),
            created_at: row.created_at,
        }
    }
}

/// Repository for listing database operations.
pub struct ListingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ListingRepository<'a> {
    /// Create a new listing repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a listing and return it with its fresh ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails, including a
    /// foreign-key violation when the owner does not exist.
    pub async fn create(&self, listing: &NewListing) -> Result<Listing, RepositoryError> {
        let row = sqlx::query_as::<_, ListingRow>(
            r"
            INSERT INTO listings (owner_id, title, description, contact, photo, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, owner_id, title, description, contact, photo, created_at
            ",
        )
        .bind(listing.owner_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(&listing.contact)
        .bind(listing.photo.as_ref().map(PhotoName::as_str))
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a listing by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ListingId) -> Result<Option<Listing>, RepositoryError> {
        let row = sqlx::query_as::<_, ListingRow>(
            r"
            SELECT id, owner_id, title, description, contact, photo, created_at
            FROM listings
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Listing::from))
    }

    /// Get every listing, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Listing>, RepositoryError> {
        let rows = sqlx::query_as::<_, ListingRow>(
            r"
            SELECT id, owner_id, title, description, contact, photo, created_at
            FROM listings
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Listing::from).collect())
    }

    /// Get the listings owned by one account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(&self, owner_id: AccountId) -> Result<Vec<Listing>, RepositoryError> {
        let rows = sqlx::query_as::<_, ListingRow>(
            r"
            SELECT id, owner_id, title, description, contact, photo, created_at
            FROM listings
            WHERE owner_id = ?
            ORDER BY id ASC
            ",
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Listing::from).collect())
    }

    /// Delete a listing, but only if it belongs to `owner_id`.
    ///
    /// # Returns
    ///
    /// Returns `true` if the listing was deleted, `false` if no listing with
    /// that ID and owner exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_owned(
        &self,
        id: ListingId,
        owner_id: AccountId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM listings
            WHERE id = ? AND owner_id = ?
            ",
        )
        .bind(id)
        .bind(owner_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use classifieds_core::{Email, Username};

    use super::*;
    use crate::db::AccountRepository;
    use crate::db::testing::migrated_pool;

    async fn account(pool: &SqlitePool, name: &str) -> AccountId {
        let username = Username::parse(name).unwrap();
        let email = Email::parse(&format!("{name}@x.com")).unwrap();
        AccountRepository::new(pool)
            .create(&username, &email, "hash")
            .await
            .unwrap()
            .id
    }

    fn draft(owner_id: AccountId, title: &str) -> NewListing {
        NewListing {
            owner_id,
            title: title.to_owned(),
            description: "Barely used".to_owned(),
            contact: "555-0100".to_owned(),
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let pool = migrated_pool().await;
        let owner = account(&pool, "alice").await;
        let repo = ListingRepository::new(&pool);

        let first = repo.create(&draft(owner, "Bike")).await.unwrap();
        let second = repo.create(&draft(owner, "Lamp")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.owner_id, owner);
        assert_eq!(first.title, "Bike");
        assert!(first.photo.is_none());
    }

    #[tokio::test]
    async fn test_photo_is_persisted() {
        let pool = migrated_pool().await;
        let owner = account(&pool, "alice").await;
        let repo = ListingRepository::new(&pool);

        let mut new = draft(owner, "Bike");
        new.photo = PhotoName::sanitize("bike.png");
        let created = repo.create(&new).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.photo.unwrap().as_str(), "bike.png");
    }

    #[tokio::test]
    async fn test_unknown_owner_is_rejected_by_foreign_key() {
        let pool = migrated_pool().await;
        let repo = ListingRepository::new(&pool);

        let err = repo.create(&draft(AccountId::new(404), "Ghost")).await;
        assert!(matches!(err, Err(RepositoryError::Database(_))));
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_owner_filters_and_keeps_insertion_order() {
        let pool = migrated_pool().await;
        let alice = account(&pool, "alice").await;
        let bob = account(&pool, "bob").await;
        let repo = ListingRepository::new(&pool);

        repo.create(&draft(alice, "A1")).await.unwrap();
        repo.create(&draft(bob, "B1")).await.unwrap();
        repo.create(&draft(alice, "A2")).await.unwrap();

        let titles: Vec<String> = repo
            .list_by_owner(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(titles, ["A1", "A2"]);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_owned_requires_matching_owner() {
        let pool = migrated_pool().await;
        let alice = account(&pool, "alice").await;
        let bob = account(&pool, "bob").await;
        let repo = ListingRepository::new(&pool);
        let listing = repo.create(&draft(alice, "Bike")).await.unwrap();

        assert!(!repo.delete_owned(listing.id, bob).await.unwrap());
        assert!(repo.get_by_id(listing.id).await.unwrap().is_some());

        assert!(repo.delete_owned(listing.id, alice).await.unwrap());
        assert!(repo.get_by_id(listing.id).await.unwrap().is_none());
        assert!(!repo.delete_owned(listing.id, alice).await.unwrap());
    }
}

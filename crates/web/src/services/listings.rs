//! Listing service.
//!
//! Creation with field validation, the public and per-owner lists, and
//! owner-only deletion.

use sqlx::SqlitePool;
use thiserror::Error;

use classifieds_core::{AccountId, FieldError, ListingId, PhotoName, required_text};

use crate::db::{ListingRepository, RepositoryError};
use crate::models::{Listing, NewListing};

const TITLE_MAX: usize = 100;
const CONTACT_MAX: usize = 100;

/// Errors that can occur in listing operations.
#[derive(Debug, Error)]
pub enum ListingError {
    /// A submitted field is missing or too long.
    #[error(transparent)]
    Validation(#[from] FieldError),

    /// No listing has the requested ID.
    #[error("listing not found")]
    NotFound,

    /// The requester does not own the listing.
    #[error("listing belongs to another account")]
    Forbidden,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ListingError {
    /// Message safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => format!("{err}."),
            Self::NotFound => "That listing does not exist.".to_owned(),
            Self::Forbidden => "You cannot delete this listing.".to_owned(),
            Self::Repository(_) => "Something went wrong. Please try again.".to_owned(),
        }
    }
}

/// The text fields of a listing as submitted, before validation.
#[derive(Debug, Clone, Default)]
pub struct ListingFields {
    pub title: String,
    pub description: String,
    pub contact: String,
}

impl ListingFields {
    /// Trim and validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first `FieldError` in form order.
    pub fn validate(&self) -> Result<Self, FieldError> {
        Ok(Self {
            title: required_text("Title", &self.title, Some(TITLE_MAX))?,
            description: required_text("Description", &self.description, None)?,
            contact: required_text("Contact", &self.contact, Some(CONTACT_MAX))?,
        })
    }
}

/// Listing service.
pub struct ListingService<'a> {
    listings: ListingRepository<'a>,
}

impl<'a> ListingService<'a> {
    /// Create a new listing service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            listings: ListingRepository::new(pool),
        }
    }

    /// Create a listing owned by `owner_id`.
    ///
    /// The caller is responsible for `owner_id` being the authenticated account.
    ///
    /// # Errors
    ///
    /// Returns `ListingError::Validation` if a text field is blank or too long.
    /// Returns `ListingError::Repository` if the insert fails.
    pub async fn create(
        &self,
        owner_id: AccountId,
        fields: &ListingFields,
        photo: Option<PhotoName>,
    ) -> Result<Listing, ListingError> {
        let fields = fields.validate()?;

        let listing = self
            .listings
            .create(&NewListing {
                owner_id,
                title: fields.title,
                description: fields.description,
                contact: fields.contact,
                photo,
            })
            .await?;

        tracing::info!(
            listing_id = %listing.id,
            owner_id = %listing.owner_id,
            "Listing created"
        );
        Ok(listing)
    }

    /// Every listing on the board, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ListingError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Listing>, ListingError> {
        Ok(self.listings.list_all().await?)
    }

    /// The listings owned by `owner_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ListingError::Repository` if the query fails.
    pub async fn list_owned(&self, owner_id: AccountId) -> Result<Vec<Listing>, ListingError> {
        Ok(self.listings.list_by_owner(owner_id).await?)
    }

    /// Delete a listing on behalf of `requester_id`.
    ///
    /// Returns the deleted listing so the caller can clean up its photo.
    ///
    /// # Errors
    ///
    /// Returns `ListingError::NotFound` if no listing has this ID.
    /// Returns `ListingError::Forbidden` if `requester_id` is not the owner; the
    /// listing is left untouched.
    pub async fn delete(
        &self,
        listing_id: ListingId,
        requester_id: AccountId,
    ) -> Result<Listing, ListingError> {
        let listing = self
            .listings
            .get_by_id(listing_id)
            .await?
            .ok_or(ListingError::NotFound)?;

        if listing.owner_id != requester_id {
            tracing::warn!(
                listing_id = %listing_id,
                owner_id = %listing.owner_id,
                requester_id = %requester_id,
                "Refused to delete listing owned by another account"
            );
            return Err(ListingError::Forbidden);
        }

        if !self.listings.delete_owned(listing_id, requester_id).await? {
            // Deleted concurrently between the lookup and the delete.
            return Err(ListingError::NotFound);
        }

        tracing::info!(listing_id = %listing_id, owner_id = %requester_id, "Listing deleted");
        Ok(listing)
    }
}

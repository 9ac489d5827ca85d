//! Listing domain types.

use chrono::{DateTime, Utc};

use classifieds_core::{AccountId, ListingId, PhotoName};

/// A classified ad (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Unique listing ID.
    pub id: ListingId,
    /// Account that posted the listing; the only one allowed to delete it.
    pub owner_id: AccountId,
    /// Short headline.
    pub title: String,
    /// Free-form body text.
    pub description: String,
    /// How buyers reach the seller (phone, email, ...).
    pub contact: String,
    /// Stored photo, if one was uploaded.
    pub photo: Option<PhotoName>,
    /// When the listing was posted.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub owner_id: AccountId,
    pub title: String,
    pub description: String,
    pub contact: String,
    pub photo: Option<PhotoName>,
}

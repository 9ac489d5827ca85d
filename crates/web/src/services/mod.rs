//! Business logic for the classifieds board.
//!
//! # Services
//!
//! - `accounts` - Registration and password login
//! - `listings` - Creating, listing, and owner-only deletion of ads
//! - `uploads` - Photo storage on local disk

pub mod accounts;
pub mod listings;
pub mod uploads;

pub use accounts::{AccountError, AccountService};
pub use listings::{ListingError, ListingFields, ListingService};
pub use uploads::{UploadError, UploadStore};

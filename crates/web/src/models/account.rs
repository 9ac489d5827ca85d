//! Account domain types.

use chrono::{DateTime, Utc};

use classifieds_core::{AccountId, Email, Username};

/// A registered account (domain type).
///
/// The credential never leaves the repository layer, so it is not part of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Unique display name.
    pub username: Username,
    /// Unique email address, used to log in.
    pub email: Email,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

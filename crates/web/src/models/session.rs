//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use classifieds_core::AccountId;

use crate::models::Account;

/// Session-stored account identity.
///
/// Minimal data stored in the session to identify the logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAccount {
    /// Account's database ID.
    pub id: AccountId,
    /// Account's username, shown in the navigation bar.
    pub username: String,
}

impl From<&Account> for CurrentAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.to_string(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in account.
    pub const CURRENT_ACCOUNT: &str = "current_account";

    /// Key for the queue of pending flash notices.
    pub const FLASH: &str = "flash";
}

//! Domain models for the classifieds board.
//!
//! These types represent validated domain objects separate from database row types.

pub mod account;
pub mod flash;
pub mod listing;
pub mod session;

pub use account::Account;
pub use flash::{Flash, FlashLevel};
pub use listing::{Listing, NewListing};
pub use session::{CurrentAccount, keys as session_keys};

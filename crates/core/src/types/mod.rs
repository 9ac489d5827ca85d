//! Core types for the classifieds board.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod field;
pub mod id;
pub mod photo;
pub mod username;

pub use email::{Email, EmailError};
pub use field::{FieldError, required_text};
pub use id::*;
pub use photo::PhotoName;
pub use username::{Username, UsernameError};

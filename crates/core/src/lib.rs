//! Classifieds Core - Shared types library.
//!
//! This crate provides common types used across all classifieds components:
//! - `web` - The public board (listings, accounts, dashboard)
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, usernames, and photo names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

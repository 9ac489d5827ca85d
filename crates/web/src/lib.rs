//! Classifieds board web server.
//!
//! Accounts register and log in, post ads with an optional photo, and manage
//! their own listings. Exposed as a library so the binary, the CLI and the
//! integration tests share one router and one set of services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

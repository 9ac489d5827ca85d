//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Every listing
//! GET  /health           - Liveness check
//! GET  /health/ready     - Readiness check (database ping)
//!
//! # Accounts
//! GET  /register         - Registration form
//! POST /register         - Registration action
//! GET  /login            - Login form
//! POST /login            - Login action
//! GET  /logout           - Logout action
//!
//! # Listings (requires auth)
//! GET  /dashboard        - The caller's listings
//! GET  /add              - Add listing form
//! POST /add              - Add listing action (multipart, optional photo)
//! POST /delete_ad/{id}   - Delete one of the caller's listings
//!
//! # Files
//! GET  /static/*         - Stylesheet
//! GET  /uploads/*        - Listing photos
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod home;
pub mod listings;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Room for the text fields of the add form on top of the photo itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the page routes.
///
/// `upload_limit` caps the request body accepted by `POST /add`.
pub fn routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
        .route(
            "/add",
            get(listings::add_page)
                .post(listings::add)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/delete_ad/{id}", post(listings::delete))
}

/// Build the complete application: routes, file serving, and the middleware stack.
pub fn app(state: AppState, session_layer: SessionManagerLayer<SqliteStore>) -> Router {
    let upload_limit = state
        .uploads()
        .max_bytes()
        .saturating_add(FORM_OVERHEAD_BYTES);
    let assets = ServeDir::new(&state.config().static_dir);
    let uploads = ServeDir::new(state.uploads().dir());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes(upload_limit))
        .nest_service("/static", assets)
        .nest_service("/uploads", uploads)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

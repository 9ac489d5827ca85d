//! The logged-in account's own listings.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAuth, flash};
use crate::models::{CurrentAccount, Flash};
use crate::routes::listings::ListingView;
use crate::services::ListingService;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub account: Option<CurrentAccount>,
    pub flashes: Vec<Flash>,
    pub listings: Vec<ListingView>,
}

/// Display the caller's listings with delete buttons.
#[instrument(skip_all, fields(account_id = %account.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    session: Session,
) -> Result<impl IntoResponse> {
    let listings = ListingService::new(state.pool())
        .list_owned(account.id)
        .await?
        .iter()
        .map(|listing| ListingView::new(listing, Some(account.id)))
        .collect();

    Ok(DashboardTemplate {
        account: Some(account),
        flashes: flash::take(&session).await,
        listings,
    })
}

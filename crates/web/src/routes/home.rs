//! Public index of every listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalAuth, flash};
use crate::models::{CurrentAccount, Flash};
use crate::routes::listings::ListingView;
use crate::services::ListingService;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub account: Option<CurrentAccount>,
    pub flashes: Vec<Flash>,
    pub listings: Vec<ListingView>,
}

/// Display every listing on the board.
#[instrument(skip(state, session, account))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    session: Session,
) -> Result<impl IntoResponse> {
    let viewer = account.as_ref().map(|a| a.id);
    let listings = ListingService::new(state.pool())
        .list_all()
        .await?
        .iter()
        .map(|listing| ListingView::new(listing, viewer))
        .collect();

    Ok(IndexTemplate {
        account,
        flashes: flash::take(&session).await,
        listings,
    })
}

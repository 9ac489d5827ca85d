//! Adding and deleting listings.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use classifieds_core::{AccountId, ListingId, PhotoName};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAuth, flash};
use crate::models::{CurrentAccount, Flash, FlashLevel, Listing};
use crate::services::{ListingError, ListingFields, ListingService, UploadError, uploads};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Listing display data for templates.
#[derive(Debug, Clone)]
pub struct ListingView {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub contact: String,
    pub photo_url: Option<String>,
    /// Whether the viewer owns this listing and may delete it.
    pub owned: bool,
}

impl ListingView {
    #[must_use]
    pub fn new(listing: &Listing, viewer: Option<AccountId>) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            contact: listing.contact.clone(),
            photo_url: listing.photo.as_ref().map(uploads::public_path),
            owned: viewer == Some(listing.owner_id),
        }
    }
}

/// Add listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "add.html")]
pub struct AddTemplate {
    pub account: Option<CurrentAccount>,
    pub flashes: Vec<Flash>,
    pub title: String,
    pub description: String,
    pub contact: String,
}

// =============================================================================
// Add
// =============================================================================

/// Display the add listing form.
#[instrument(skip_all)]
pub async fn add_page(RequireAuth(account): RequireAuth, session: Session) -> Response {
    AddTemplate {
        account: Some(account),
        flashes: flash::take(&session).await,
        title: String::new(),
        description: String::new(),
        contact: String::new(),
    }
    .into_response()
}

/// A parsed `multipart/form-data` submission of the add form.
#[derive(Default)]
struct AddSubmission {
    fields: ListingFields,
    photo_name: Option<String>,
    photo: Vec<u8>,
}

/// Why a submission was turned back to the form.
enum Rejection {
    Listing(ListingError),
    Upload(UploadError),
}

impl Rejection {
    fn user_message(&self) -> String {
        match self {
            Self::Listing(err) => err.user_message(),
            Self::Upload(err) => {
                let mut message = err.to_string();
                if let Some(first) = message.get_mut(..1) {
                    first.make_ascii_uppercase();
                }
                format!("{message}.")
            }
        }
    }
}

/// Handle the add listing form.
///
/// Text fields are validated before the photo touches the disk, and a
/// stored photo is removed again if the listing cannot be saved.
#[instrument(skip_all, fields(account_id = %account.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let submission = match read_submission(multipart, state.uploads().max_bytes()).await {
        Ok(submission) => submission,
        Err(SubmissionError::TooLarge) => {
            let max = state.uploads().max_bytes();
            let rejection = Rejection::Upload(UploadError::TooLarge { max });
            return Ok(rerender(account, &session, AddSubmission::default(), &rejection).await);
        }
        Err(SubmissionError::Malformed(message)) => return Err(AppError::BadRequest(message)),
    };

    if let Err(err) = submission.fields.validate() {
        let rejection = Rejection::Listing(err.into());
        return Ok(rerender(account, &session, submission, &rejection).await);
    }

    let photo = match state
        .uploads()
        .store(submission.photo_name.as_deref(), &submission.photo)
        .await
    {
        Ok(photo) => photo,
        Err(err @ UploadError::TooLarge { .. }) => {
            let rejection = Rejection::Upload(err);
            return Ok(rerender(account, &session, submission, &rejection).await);
        }
        Err(err) => return Err(err.into()),
    };

    let created = ListingService::new(state.pool())
        .create(account.id, &submission.fields, photo.clone())
        .await;

    match created {
        Ok(_) => {
            flash::push(&session, FlashLevel::Success, "Listing added.").await?;
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(err) => {
            discard_photo(&state, photo.as_ref()).await;
            match err {
                ListingError::Validation(_) => {
                    let rejection = Rejection::Listing(err);
                    Ok(rerender(account, &session, submission, &rejection).await)
                }
                other => Err(other.into()),
            }
        }
    }
}

async fn discard_photo(state: &AppState, photo: Option<&PhotoName>) {
    if let Some(photo) = photo {
        state.uploads().remove(photo).await;
    }
}

async fn rerender(
    account: CurrentAccount,
    session: &Session,
    submission: AddSubmission,
    rejection: &Rejection,
) -> Response {
    let mut flashes = flash::take(session).await;
    flashes.push(Flash::new(FlashLevel::Danger, rejection.user_message()));

    let page = AddTemplate {
        account: Some(account),
        flashes,
        title: submission.fields.title,
        description: submission.fields.description,
        contact: submission.fields.contact,
    };
    (StatusCode::BAD_REQUEST, page).into_response()
}

enum SubmissionError {
    TooLarge,
    Malformed(String),
}

impl From<axum::extract::multipart::MultipartError> for SubmissionError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge
        } else {
            Self::Malformed(err.body_text())
        }
    }
}

/// Collect the form fields. Unknown fields are ignored.
async fn read_submission(
    mut multipart: Multipart,
    max_photo_bytes: usize,
) -> std::result::Result<AddSubmission, SubmissionError> {
    let mut submission = AddSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "title" => submission.fields.title = field.text().await?,
            "description" => submission.fields.description = field.text().await?,
            "contact" => submission.fields.contact = field.text().await?,
            "photo" => {
                submission.photo_name = field.file_name().map(ToOwned::to_owned);
                let bytes = field.bytes().await?;
                if bytes.len() > max_photo_bytes {
                    return Err(SubmissionError::TooLarge);
                }
                submission.photo = bytes.to_vec();
            }
            _ => {}
        }
    }

    Ok(submission)
}

// =============================================================================
// Delete
// =============================================================================

/// Delete one of the caller's listings.
///
/// Every outcome ends on the dashboard with a notice.
#[instrument(skip_all, fields(account_id = %account.id, listing_id = id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response> {
    match ListingService::new(state.pool())
        .delete(ListingId::new(id), account.id)
        .await
    {
        Ok(listing) => {
            discard_photo(&state, listing.photo.as_ref()).await;
            flash::push(&session, FlashLevel::Success, "Listing deleted.").await?;
        }
        Err(err @ (ListingError::NotFound | ListingError::Forbidden)) => {
            flash::push(&session, FlashLevel::Danger, err.user_message()).await?;
        }
        Err(err) => return Err(err.into()),
    }

    Ok(Redirect::to("/dashboard").into_response())
}

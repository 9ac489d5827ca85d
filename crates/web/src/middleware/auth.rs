//! Authentication extractors.
//!
//! The logged-in account lives in the server-side session under
//! `session_keys::CURRENT_ACCOUNT`.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::flash;
use crate::models::{CurrentAccount, FlashLevel, session_keys};

/// Extractor that requires a logged-in account.
///
/// Anonymous requests get a warning notice and a redirect to `/login`; the
/// handler never runs, so nothing is mutated.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireAuth(account): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", account.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentAccount);

/// Rejection for `RequireAuth`.
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// No session layer is installed.
    MissingSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::MissingSession => {
                tracing::error!("Session layer missing from router");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::MissingSession)?;

        if let Some(account) = current_account(session).await {
            return Ok(Self(account));
        }

        let message = if parts.uri.path() == "/add" {
            "Log in to add a listing."
        } else {
            "Log in to access this page."
        };
        flash::notify(session, FlashLevel::Warning, message).await;

        Err(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the logged-in account.
///
/// Never rejects.
pub struct OptionalAuth(pub Option<CurrentAccount>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account = match parts.extensions.get::<Session>() {
            Some(session) => current_account(session).await,
            None => None,
        };

        Ok(Self(account))
    }
}

async fn current_account(session: &Session) -> Option<CurrentAccount> {
    session
        .get::<CurrentAccount>(session_keys::CURRENT_ACCOUNT)
        .await
        .ok()
        .flatten()
}

/// Store the logged-in account in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_account(
    session: &Session,
    account: &CurrentAccount,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ACCOUNT, account).await
}

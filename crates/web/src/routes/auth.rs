//! Registration, login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, flash, set_current_account};
use crate::models::{CurrentAccount, Flash, FlashLevel};
use crate::services::{AccountError, AccountService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Registration form data.
///
/// Missing fields deserialize as empty and are reported by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub account: Option<CurrentAccount>,
    pub flashes: Vec<Flash>,
    pub username: String,
    pub email: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub account: Option<CurrentAccount>,
    pub flashes: Vec<Flash>,
    pub email: String,
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip_all)]
pub async fn register_page(OptionalAuth(account): OptionalAuth, session: Session) -> Response {
    RegisterTemplate {
        account,
        flashes: flash::take(&session).await,
        username: String::new(),
        email: String::new(),
    }
    .into_response()
}

/// Handle registration form submission.
///
/// On success the new account is sent to the login page; on a rejected
/// submission the form is shown again with the entered username and email.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    match AccountService::new(state.pool())
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(_) => {
            flash::push(
                &session,
                FlashLevel::Success,
                "Registration complete. You can now log in.",
            )
            .await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(err) if err.is_internal() => Err(AppError::Account(err)),
        Err(err) => {
            tracing::warn!(error = %err, "Registration rejected");
            let mut flashes = flash::take(&session).await;
            flashes.push(Flash::new(FlashLevel::Danger, err.user_message()));

            let page = RegisterTemplate {
                account,
                flashes,
                username: form.username,
                email: form.email,
            };
            Ok((err.status(), page).into_response())
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page, or send an already logged-in visitor to the dashboard.
#[instrument(skip_all)]
pub async fn login_page(
    OptionalAuth(account): OptionalAuth,
    session: Session,
) -> Result<Response> {
    if account.is_some() {
        return already_logged_in(&session).await;
    }

    Ok(LoginTemplate {
        account,
        flashes: flash::take(&session).await,
        email: String::new(),
    }
    .into_response())
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    OptionalAuth(account): OptionalAuth,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if account.is_some() {
        return already_logged_in(&session).await;
    }

    match AccountService::new(state.pool())
        .authenticate(&form.email, &form.password)
        .await
    {
        Ok(account) => {
            let current = CurrentAccount::from(&account);

            // New identity, new session ID.
            session.cycle_id().await?;
            set_current_account(&session, &current).await?;
            set_sentry_user(&current.id, &current.username);

            tracing::info!(account_id = %current.id, "Account logged in");
            flash::push(&session, FlashLevel::Success, "You are now logged in.").await?;
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(err) if err.is_internal() => Err(AppError::Account(err)),
        Err(err) => {
            tracing::warn!(error = %err, "Login rejected");
            let level = match err {
                AccountError::AccountNotFound => FlashLevel::Warning,
                _ => FlashLevel::Danger,
            };
            let mut flashes = flash::take(&session).await;
            flashes.push(Flash::new(level, err.user_message()));

            let page = LoginTemplate {
                account: None,
                flashes,
                email: form.email,
            };
            Ok((err.status(), page).into_response())
        }
    }
}

async fn already_logged_in(session: &Session) -> Result<Response> {
    flash::push(session, FlashLevel::Info, "You are already logged in.").await?;
    Ok(Redirect::to("/dashboard").into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// Log out and return to the index.
///
/// Works for anonymous visitors too; they simply see the notice.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Response> {
    session.flush().await?;
    clear_sentry_user();

    flash::push(&session, FlashLevel::Info, "You have been logged out.").await?;
    Ok(Redirect::to("/").into_response())
}

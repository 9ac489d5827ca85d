//! Account management commands.

use classifieds_core::AccountId;
use classifieds_web::services::AccountService;
use sqlx::SqlitePool;

use super::CliError;

/// Register an account through the same service the web app uses.
///
/// # Errors
///
/// Returns `CliError::Account` for invalid input or a duplicate username/email.
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<AccountId, CliError> {
    let account = AccountService::new(pool)
        .register(username, email, password)
        .await?;

    tracing::info!(
        "Account created successfully! ID: {}, Username: {}, Email: {}",
        account.id,
        account.username,
        account.email
    );

    Ok(account.id)
}

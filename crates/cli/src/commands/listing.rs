//! Listing inspection commands.

use classifieds_core::AccountId;
use classifieds_web::models::Listing;
use classifieds_web::services::{AccountService, ListingService};
use sqlx::SqlitePool;

use super::CliError;

/// Print listings, one per line: `id owner_id title contact photo`, tab-separated.
///
/// # Errors
///
/// Returns `CliError::Account` if `owner` names no account.
/// Returns `CliError::Listing` if the query fails.
pub async fn list(pool: &SqlitePool, owner: Option<i64>) -> Result<(), CliError> {
    let listings = load(pool, owner).await?;

    #[allow(clippy::print_stdout)]
    for listing in &listings {
        println!("{}", format_row(listing));
    }

    tracing::info!("{} listing(s)", listings.len());
    Ok(())
}

async fn load(pool: &SqlitePool, owner: Option<i64>) -> Result<Vec<Listing>, CliError> {
    let service = ListingService::new(pool);
    match owner {
        Some(owner) => {
            let account = AccountService::new(pool).get(AccountId::new(owner)).await?;
            tracing::info!(username = %account.username, "Listing owner");
            Ok(service.list_owned(account.id).await?)
        }
        None => Ok(service.list_all().await?),
    }
}

fn format_row(listing: &Listing) -> String {
    let photo = listing.photo.as_ref().map_or("-", |p| p.as_str());
    format!(
        "{}\t{}\t{}\t{}\t{}",
        listing.id,
        listing.owner_id,
        single_line(&listing.title),
        single_line(&listing.contact),
        photo
    )
}

/// Tabs and newlines would break the column layout.
fn single_line(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use classifieds_core::{ListingId, PhotoName};
    use classifieds_web::db;
    use classifieds_web::services::{AccountError, ListingFields};

    use super::*;

    #[test]
    fn test_format_row() {
        let listing = Listing {
            id: ListingId::new(3),
            owner_id: AccountId::new(1),
            title: "Red\tbike".to_owned(),
            description: "Fast".to_owned(),
            contact: "555-0100".to_owned(),
            photo: Some(PhotoName::from_stored("0123abcd_bike.png".to_owned())),
            created_at: Utc::now(),
        };
        assert_eq!(
            format_row(&listing),
            "3\t1\tRed bike\t555-0100\t0123abcd_bike.png"
        );
    }

    async fn pool() -> SqlitePool {
        let pool = db::connect_in_memory().await.expect("open");
        db::run_migrations(&pool).await.expect("migrate");
        pool
    }

    #[tokio::test]
    async fn test_load_filters_by_owner() {
        let pool = pool().await;
        let accounts = AccountService::new(&pool);
        let alice = accounts.register("alice", "a@x.com", "pw1").await.expect("alice");
        let bob = accounts.register("bob", "b@x.com", "pw2").await.expect("bob");

        let listings = ListingService::new(&pool);
        for (owner, title) in [(alice.id, "Lamp"), (bob.id, "Desk"), (alice.id, "Chair")] {
            let fields = ListingFields {
                title: title.to_owned(),
                description: "Used".to_owned(),
                contact: "555-0100".to_owned(),
            };
            listings.create(owner, &fields, None).await.expect("create");
        }

        let all = load(&pool, None).await.expect("all");
        assert_eq!(all.len(), 3);

        let owned = load(&pool, Some(alice.id.as_i64())).await.expect("owned");
        let titles: Vec<_> = owned.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["Lamp", "Chair"]);
    }

    #[tokio::test]
    async fn test_load_unknown_owner() {
        let pool = pool().await;
        let err = load(&pool, Some(42)).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::Account(AccountError::AccountNotFound)
        ));
    }
}

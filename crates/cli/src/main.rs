//! Classifieds CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! classifieds-cli migrate
//!
//! # Create an account
//! classifieds-cli account create --username alice --email a@x.com --password pw1
//!
//! # List every listing, or one account's
//! classifieds-cli listing list
//! classifieds-cli listing list --owner 1
//! ```
//!
//! The database is chosen the same way as for the web server
//! (`CLASSIFIEDS_DATABASE_URL`, falling back to `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "classifieds-cli")]
#[command(author, version, about = "Classifieds board CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Inspect listings
    Listing {
        #[command(subcommand)]
        action: ListingAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Register a new account
    Create {
        /// Unique username (at most 50 characters)
        #[arg(short, long)]
        username: String,

        /// Unique email address
        #[arg(short, long)]
        email: String,

        /// Password (stored as an Argon2id hash)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum ListingAction {
    /// Print listings as tab-separated lines
    List {
        /// Only show listings owned by this account ID
        #[arg(short, long)]
        owner: Option<i64>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let pool = commands::connect().await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&pool).await?,
        Commands::Account { action } => match action {
            AccountAction::Create {
                username,
                email,
                password,
            } => {
                commands::account::create(&pool, &username, &email, &password).await?;
            }
        },
        Commands::Listing { action } => match action {
            ListingAction::List { owner } => commands::listing::list(&pool, owner).await?,
        },
    }
    Ok(())
}

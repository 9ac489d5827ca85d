//! Integration test harness for the classifieds board.
//!
//! Each [`TestApp`] runs the real router against its own in-memory `SQLite`
//! database and a throwaway upload directory. Requests go through
//! `axum-test`'s in-process transport; every [`TestApp::client`] has its own
//! cookie jar, so two clients behave like two browsers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p classifieds-integration-tests
//! ```

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use axum::Router;
use axum_test::TestServer;
use sqlx::SqlitePool;

use classifieds_core::{AccountId, Email};
use classifieds_web::config::WebConfig;
use classifieds_web::db::{self, AccountRepository};
use classifieds_web::middleware::create_session_layer;
use classifieds_web::routes;
use classifieds_web::state::AppState;

/// The web crate's stylesheet directory, independent of the test's working directory.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static");

/// Largest photo accepted by test apps.
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024;

/// A running application with its database and upload directory.
pub struct TestApp {
    pub pool: SqlitePool,
    pub upload_dir: PathBuf,
    router: Router,
}

impl TestApp {
    /// Build a fresh application.
    pub async fn new() -> Self {
        let upload_dir = std::env::temp_dir().join(format!(
            "classifieds-it-{}",
            uuid::Uuid::new_v4().simple()
        ));
        let dir = upload_dir.to_string_lossy().into_owned();
        let config = WebConfig::from_lookup(|key| match key {
            "CLASSIFIEDS_STATIC_DIR" => Some(STATIC_DIR.to_owned()),
            "CLASSIFIEDS_UPLOAD_DIR" => Some(dir.clone()),
            "CLASSIFIEDS_MAX_UPLOAD_BYTES" => Some(TEST_MAX_UPLOAD_BYTES.to_string()),
            _ => None,
        })
        .expect("test configuration should parse");

        let pool = db::connect_in_memory()
            .await
            .expect("in-memory database should open");
        db::run_migrations(&pool)
            .await
            .expect("migrations should apply");

        let session_layer = create_session_layer(&pool, &config)
            .await
            .expect("session store should migrate");

        let state = AppState::new(config, pool.clone());
        state
            .uploads()
            .ensure_dir()
            .await
            .expect("upload dir should be created");

        Self {
            pool,
            upload_dir,
            router: routes::app(state, session_layer),
        }
    }

    /// A new client with its own cookie jar.
    pub fn client(&self) -> TestServer {
        TestServer::builder()
            .save_cookies()
            .build(self.router.clone())
            .expect("test server should start")
    }

    /// Look up an account ID by email.
    pub async fn account_id(&self, email: &str) -> AccountId {
        let email = Email::parse(email).expect("valid email");
        AccountRepository::new(&self.pool)
            .get_by_email(&email)
            .await
            .expect("query should succeed")
            .expect("account should exist")
            .id
    }

    /// Path of a stored upload.
    pub fn upload_path(&self, name: &str) -> PathBuf {
        self.upload_dir.join(name)
    }

    /// Number of files in the upload directory.
    pub fn upload_count(&self) -> usize {
        count_files(&self.upload_dir)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map_or(0, |entries| entries.count())
}

/// Submit the registration form.
pub async fn register(
    client: &TestServer,
    username: &str,
    email: &str,
    password: &str,
) -> axum_test::TestResponse {
    client
        .post("/register")
        .form(&[("username", username), ("email", email), ("password", password)])
        .await
}

/// Submit the login form.
pub async fn login(client: &TestServer, email: &str, password: &str) -> axum_test::TestResponse {
    client
        .post("/login")
        .form(&[("email", email), ("password", password)])
        .await
}

/// Submit the add listing form without a photo.
pub async fn add_listing(client: &TestServer, title: &str) -> axum_test::TestResponse {
    let form = axum_test::multipart::MultipartForm::new()
        .add_text("title", title)
        .add_text("description", "Gently used")
        .add_text("contact", "call 555-0100");
    client.post("/add").multipart(form).await
}

/// The `Location` header of a redirect.
pub fn location(response: &axum_test::TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .expect("location should be ASCII")
        .to_owned()
}

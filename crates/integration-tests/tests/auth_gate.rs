//! Account-scoped routes redirect anonymous visitors and never mutate.

use axum::http::StatusCode;

use classifieds_integration_tests::{TestApp, add_listing, location, login, register};
use classifieds_web::services::{ListingFields, ListingService};

#[tokio::test]
async fn test_dashboard_requires_login() {
    let app = TestApp::new().await;
    let client = app.client();

    let response = client.get("/dashboard").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    client
        .get("/login")
        .await
        .assert_text_contains("Log in to access this page.");
}

#[tokio::test]
async fn test_add_requires_login_and_creates_nothing() {
    let app = TestApp::new().await;
    let client = app.client();

    let response = client.get("/add").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = add_listing(&client, "Sneaky").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    client
        .get("/login")
        .await
        .assert_text_contains("Log in to add a listing.");
    assert!(
        ListingService::new(&app.pool)
            .list_all()
            .await
            .expect("query")
            .is_empty()
    );
}

#[tokio::test]
async fn test_delete_requires_login_and_keeps_listing() {
    let app = TestApp::new().await;
    let owner = app.client();
    register(&owner, "alice", "a@x.com", "pw1").await;
    login(&owner, "a@x.com", "pw1").await;
    let owner_id = app.account_id("a@x.com").await;

    let listing = ListingService::new(&app.pool)
        .create(
            owner_id,
            &ListingFields {
                title: "Lamp".to_owned(),
                description: "Brass".to_owned(),
                contact: "555-0100".to_owned(),
            },
            None,
        )
        .await
        .expect("create");

    let anonymous = app.client();
    let response = anonymous.post(&format!("/delete_ad/{}", listing.id)).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let remaining = ListingService::new(&app.pool)
        .list_owned(owner_id)
        .await
        .expect("query");
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = TestApp::new().await;
    let client = app.client();
    register(&client, "alice", "a@x.com", "pw1").await;
    login(&client, "a@x.com", "pw1").await;
    client.get("/dashboard").await.assert_status_ok();

    let response = client.get("/logout").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let index = client.get("/").await;
    index.assert_text_contains("You have been logged out.");
    index.assert_text_contains("href=\"/login\"");

    client
        .get("/dashboard")
        .await
        .assert_status(StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_page_redirects_when_logged_in() {
    let app = TestApp::new().await;
    let client = app.client();
    register(&client, "alice", "a@x.com", "pw1").await;
    login(&client, "a@x.com", "pw1").await;

    let response = client.get("/login").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    client
        .get("/dashboard")
        .await
        .assert_text_contains("You are already logged in.");
}

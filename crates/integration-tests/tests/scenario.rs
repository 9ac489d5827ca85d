//! End-to-end walk through two accounts sharing the board.

use axum::http::StatusCode;

use classifieds_integration_tests::{TestApp, add_listing, location, login, register};
use classifieds_web::services::ListingService;

#[tokio::test]
async fn test_two_accounts_and_ownership() {
    let app = TestApp::new().await;
    let alice = app.client();
    let bob = app.client();

    // alice registers and is sent to the login page
    let response = register(&alice, "alice", "a@x.com", "pw1").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    alice
        .get("/login")
        .await
        .assert_text_contains("Registration complete. You can now log in.");

    // bob tries alice's email
    let response = register(&bob, "bob", "a@x.com", "pw2").await;
    response.assert_status(StatusCode::CONFLICT);
    response.assert_text_contains("An account with this email already exists.");

    // alice logs in
    let response = login(&alice, "a@x.com", "pw1").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    let alice_id = app.account_id("a@x.com").await;

    let dashboard = alice.get("/dashboard").await;
    dashboard.assert_status_ok();
    dashboard.assert_text_contains("You are now logged in.");
    dashboard.assert_text_contains("alice");

    // alice adds a listing
    let response = add_listing(&alice, "Red bike").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    alice.get("/dashboard").await.assert_text_contains("Red bike");

    let listings = ListingService::new(&app.pool);
    let owned = listings.list_owned(alice_id).await.expect("query");
    assert_eq!(owned.len(), 1);
    let listing_id = owned.first().expect("one listing").id;

    // the public index shows it to anyone
    app.client().get("/").await.assert_text_contains("Red bike");

    // bob registers with his own email and tries to delete alice's listing
    register(&bob, "bob", "b@x.com", "pw2")
        .await
        .assert_status(StatusCode::SEE_OTHER);
    login(&bob, "b@x.com", "pw2")
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let response = bob.post(&format!("/delete_ad/{listing_id}")).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    bob.get("/dashboard")
        .await
        .assert_text_contains("You cannot delete this listing.");
    assert_eq!(listings.list_owned(alice_id).await.expect("query").len(), 1);

    // alice deletes it
    let response = alice.post(&format!("/delete_ad/{listing_id}")).await;
    response.assert_status(StatusCode::SEE_OTHER);
    let dashboard = alice.get("/dashboard").await;
    dashboard.assert_text_contains("Listing deleted.");
    dashboard.assert_text_contains("You have no listings yet.");
    assert!(listings.list_owned(alice_id).await.expect("query").is_empty());
}

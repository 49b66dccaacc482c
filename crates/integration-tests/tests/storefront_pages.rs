//! Integration tests for pages, the games fragment and cookie consent.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use furia_integration_tests::TestApp;

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new().await;

    let resp = app.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let mut app = TestApp::new().await;

    let resp = app.get("/tickets").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_home_lists_upcoming_games() {
    let mut app = TestApp::new().await;

    let resp = app.get("/").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("vs. Rhein Rockets"));
    assert!(resp.body.contains("LANXESS arena"));
    assert!(resp.body.contains("Eissporthalle Essen"));
    assert!(!resp.body.contains("Past Opponent"));
}

#[tokio::test]
async fn test_games_fragment() {
    let mut app = TestApp::new().await;

    let resp = app.get("/games").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.matches("class=\"game-card ").count(), 2);
    assert!(resp.body.contains("SUN"));
    assert!(resp.body.contains("15 NOV"));
    assert!(resp.body.contains("19:30"));
}

#[tokio::test]
async fn test_games_unavailable_without_feed() {
    let mut app =
        TestApp::with_vars(&[("FURIA_SCHEDULE_SOURCE", "/nonexistent/schedule.json")]).await;

    let resp = app.get("/games").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Upcoming games could not be loaded."));

    // Feed problems never affect the cart
    let resp = app
        .post_form(
            "/cart/add",
            &[("key", "puck"), ("name", "Souvenir Puck"), ("price", "8.00")],
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_shop_lists_merchandise() {
    let mut app = TestApp::new().await;

    let resp = app.get("/shop").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Fan Scarf"));
    assert!(resp.body.contains("15.00€"));
    assert!(resp.body.contains("hx-post=\"/cart/add\""));
}

#[tokio::test]
async fn test_nav_badge_shows_cart_count() {
    let mut app = TestApp::new().await;
    app.post_form(
        "/cart/add",
        &[("key", "cap"), ("name", "Snapback Cap"), ("price", "22.50"), ("quantity", "2")],
    )
    .await;

    let resp = app.get("/shop").await;
    assert!(resp.body.contains(">2</span>"));
}

#[tokio::test]
async fn test_cookie_banner_until_accepted() {
    let mut app = TestApp::new().await;

    let resp = app.get("/").await;
    assert!(resp.body.contains("id=\"cookieConsent\""));

    let resp = app.post_form("/cookies/accept", &[]).await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app.get("/").await;
    assert!(!resp.body.contains("id=\"cookieConsent\""));
}

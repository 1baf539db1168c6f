//! Integration tests for order history and tracking.

#![allow(clippy::unwrap_used)]

use std::time::{Duration, Instant};

use kitbay_integration_tests::TestServer;
use reqwest::StatusCode;
use rust_decimal::Decimal;

fn decimal(value: &serde_json::Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_order_history_newest_first() {
    let server = TestServer::start().await.unwrap();

    let resp = server.get("/orders").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.unwrap();

    let newest = page.find("100352").unwrap();
    let oldest = page.find("100234").unwrap();
    assert!(newest < oldest);
}

#[tokio::test]
async fn test_track_page() {
    let server = TestServer::start().await.unwrap();

    let resp = server
        .get("/orders/track/a1b2c3d4-e5f6-7890-abcd-ef1234567890")
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.unwrap();
    assert!(page.contains("100234"));
    assert!(page.contains("Montreal"));

    let resp = server.get("/orders/track/nope").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("Order not found"));
}

#[tokio::test]
async fn test_order_api_totals() {
    let server = TestServer::start().await.unwrap();

    let order = server.get_json("/api/orders/ffe0-22").await.unwrap();
    assert_eq!(order["order"]["orderNumber"], "100301");

    let usd = &order["totals"]["usd"];
    let subtotal = decimal(&usd["subtotal"]);
    let tax = decimal(&usd["tax"]);
    assert_eq!(subtotal, Decimal::from(458));
    assert_eq!(decimal(&usd["total"]), subtotal + tax);

    let timeline = order["timeline"].as_array().unwrap();
    assert!(!timeline.is_empty());
    assert!(order["trackingNumber"].as_str().unwrap().starts_with(
        order["carrier"].as_str().unwrap()
    ));
}

#[tokio::test]
async fn test_order_api_unknown() {
    let server = TestServer::start().await.unwrap();

    let resp = server.get("/api/orders/nope").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "order nope not found");
}

#[tokio::test]
async fn test_order_pages_wait_for_min_delay() {
    let server = TestServer::start_with(&[("STOREFRONT_ORDERS_MIN_DELAY_MS", "150")])
        .await
        .unwrap();

    let started = Instant::now();
    let resp = server.get("/orders").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(started.elapsed() >= Duration::from_millis(150));
}

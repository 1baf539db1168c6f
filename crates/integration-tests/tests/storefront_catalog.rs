//! Integration tests for the home, category and product pages.

#![allow(clippy::unwrap_used)]

use kitbay_integration_tests::TestServer;
use reqwest::StatusCode;

#[tokio::test]
async fn test_home_lists_categories_and_recent_orders() {
    let server = TestServer::start().await.unwrap();

    let resp = server.get("/").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.unwrap();
    assert!(page.contains("href=\"/category/laptop\""));
    assert!(page.contains("href=\"/category/docking-station\""));
    assert!(page.contains("3 items"));

    assert!(page.contains("Order 100352"));
    assert!(!page.contains("Order 100234"));
}

#[tokio::test]
async fn test_category_page() {
    let server = TestServer::start().await.unwrap();

    let resp = server.get("/category/laptop").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.unwrap();
    assert!(page.contains("value=\"XPS 13\""));
    assert!(page.contains("value=\"MacBook Pro 14\""));
    assert!(!page.contains("value=\"WD19S\""));

    let resp = server.get("/category/webcam").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_page_shows_specs() {
    let server = TestServer::start().await.unwrap();

    let resp = server.get("/product/XPS%2013").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.unwrap();
    assert!(page.contains("Specifications"));
    assert!(page.contains("Compatible dock"));
    assert!(page.contains("WD19S"));
    assert!(page.contains("$1,000"));
    assert!(page.contains("hx-post=\"/cart/add\""));

    let resp = server.get("/product/Nope").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_new_visitor_can_shop_from_the_catalog() {
    let server = TestServer::start().await.unwrap();

    let cart = server.get("/cart").await.unwrap().text().await.unwrap();
    assert!(cart.contains("Browse the catalog"));

    let category = server
        .get("/category/monitor")
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(category.contains("value=\"U2723QE\""));

    let resp = server.add_to_cart("U2723QE").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(server.get_json("/api/cart").await.unwrap()["count"], 1);
}

#[tokio::test]
async fn test_catalog_prices_follow_currency() {
    let server = TestServer::start().await.unwrap();
    server
        .post_form("/currency", &[("currency", "CAD")])
        .await
        .unwrap();

    let page = server
        .get("/product/XPS%2013")
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("$1,399"));
}

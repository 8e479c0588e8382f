//! Integration tests for the cart and checkout summary.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use hearthside_core::{MAX_LINE_QUANTITY, ProductId};
use hearthside_integration_tests::{StubApi, TestStorefront, sample_products};
use rust_decimal::Decimal;
use serde_json::{Value, json};

async fn setup() -> (StubApi, TestStorefront) {
    let api = StubApi::spawn(sample_products()).await.unwrap();
    let storefront = TestStorefront::spawn_loaded(&api).await.unwrap();
    (api, storefront)
}

async fn add(storefront: &TestStorefront, id: &str) -> reqwest::Response {
    storefront
        .client
        .post(storefront.url("/cart/items"))
        .json(&json!({"product_id": id}))
        .send()
        .await
        .unwrap()
}

async fn set_quantity(storefront: &TestStorefront, id: &str, quantity: i64) -> Value {
    let resp = storefront
        .client
        .put(storefront.url(&format!("/cart/items/{id}")))
        .json(&json!({"quantity": quantity}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

async fn cart(storefront: &TestStorefront) -> Value {
    storefront
        .client
        .get(storefront.url("/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn count(storefront: &TestStorefront) -> u64 {
    let body: Value = storefront
        .client
        .get(storefront.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["count"].as_u64().unwrap()
}

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_adding_twice_increments_quantity() {
    let (_api, storefront) = setup().await;

    assert_eq!(add(&storefront, "p5").await.status(), 200);
    let resp = add(&storefront, "p5").await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(decimal(&body["total"]), Decimal::from(50));
    assert_eq!(body["subtotal"], "$50.00");
    assert_eq!(count(&storefront).await, 2);
}

#[tokio::test]
async fn test_cart_uses_sale_price() {
    let (_api, storefront) = setup().await;
    let body: Value = add(&storefront, "p2").await.json().await.unwrap();

    assert_eq!(decimal(&body["items"][0]["unit_price"]), Decimal::new(3999, 2));
    assert_eq!(body["items"][0]["name"], "Cast Iron Skillet");
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let (_api, storefront) = setup().await;
    assert_eq!(add(&storefront, "nope").await.status(), 404);
    assert_eq!(count(&storefront).await, 0);
}

#[tokio::test]
async fn test_add_out_of_stock_product_is_conflict() {
    let (_api, storefront) = setup().await;
    let resp = add(&storefront, "p3").await;
    assert_eq!(resp.status(), 409);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unavailable: Wool Throw is out of stock");
    assert!(storefront.state.cart().is_empty());
}

// =============================================================================
// Update, Remove, Clear
// =============================================================================

#[tokio::test]
async fn test_update_quantity_recomputes_total() {
    let (_api, storefront) = setup().await;
    add(&storefront, "p1").await;
    add(&storefront, "p5").await;

    let body = set_quantity(&storefront, "p1", 4).await;
    assert_eq!(decimal(&body["total"]), Decimal::from(75));
    assert_eq!(body["item_count"], 5);

    // Order of lines is insertion order, not update order
    assert_eq!(body["items"][0]["id"], "p1");
    assert_eq!(body["items"][1]["id"], "p5");
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let (_api, storefront) = setup().await;
    add(&storefront, "p1").await;
    add(&storefront, "p5").await;

    let body = set_quantity(&storefront, "p1", 0).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["id"], "p5");

    let body = set_quantity(&storefront, "p5", -3).await;
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(decimal(&body["total"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_update_unknown_line_is_noop() {
    let (_api, storefront) = setup().await;
    add(&storefront, "p1").await;

    let body = set_quantity(&storefront, "p4", 2).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["item_count"], 1);
}

#[tokio::test]
async fn test_huge_quantity_keeps_cart_usable() {
    let (_api, storefront) = setup().await;
    add(&storefront, "p1").await;
    add(&storefront, "p5").await;

    let body = set_quantity(&storefront, "p1", i64::from(u32::MAX)).await;
    assert_eq!(body["items"][0]["quantity"], MAX_LINE_QUANTITY);
    set_quantity(&storefront, "p5", i64::from(u32::MAX)).await;

    assert_eq!(count(&storefront).await, 2 * u64::from(MAX_LINE_QUANTITY));
    let resp = storefront
        .client
        .get(storefront.url("/checkout/summary"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let (_api, storefront) = setup().await;
    add(&storefront, "p1").await;
    add(&storefront, "p2").await;
    add(&storefront, "p4").await;

    let resp = storefront
        .client
        .delete(storefront.url("/cart/items/p2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let state = storefront.state.cart();
    assert!(state.item(&ProductId::new("p2")).is_none());
    assert_eq!(state.items.len(), 2);

    let resp = storefront
        .client
        .delete(storefront.url("/cart"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(cart(&storefront).await["items"].as_array().unwrap().is_empty());
    assert_eq!(count(&storefront).await, 0);
}

#[tokio::test]
async fn test_cart_survives_catalog_refresh() {
    let (api, storefront) = setup().await;
    add(&storefront, "p1").await;

    api.set_products(Vec::new());
    storefront
        .client
        .post(storefront.url("/catalog/refresh"))
        .send()
        .await
        .unwrap();

    assert_eq!(count(&storefront).await, 1);
}

// =============================================================================
// Checkout Summary
// =============================================================================

#[tokio::test]
async fn test_summary_of_empty_cart_is_bad_request() {
    let (_api, storefront) = setup().await;
    let resp = storefront
        .client
        .get(storefront.url("/checkout/summary"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_summary_adds_flat_shipping() {
    let (_api, storefront) = setup().await;
    add(&storefront, "p1").await;
    add(&storefront, "p1").await;
    add(&storefront, "p2").await;

    let resp = storefront
        .client
        .get(storefront.url("/checkout/summary"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["item_count"], 3);
    assert_eq!(body["display_subtotal"], "$64.99");
    assert_eq!(body["display_shipping"], "$10.00");
    assert_eq!(body["display_total"], "$74.99");
}

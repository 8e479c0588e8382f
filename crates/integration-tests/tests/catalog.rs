//! Integration tests for catalog listing, filtering and refresh.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use hearthside_integration_tests::{StubApi, TestStorefront, api_product, sample_products};
use rust_decimal::Decimal;
use serde_json::Value;

async fn setup() -> (StubApi, TestStorefront) {
    let api = StubApi::spawn(sample_products()).await.unwrap();
    let storefront = TestStorefront::spawn_loaded(&api).await.unwrap();
    (api, storefront)
}

async fn listing(storefront: &TestStorefront, query: &str) -> Value {
    let resp = storefront
        .client
        .get(storefront.url(&format!("/products{query}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

fn ids(body: &Value) -> Vec<String> {
    body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_featured_listing_keeps_remote_order() {
    let (_api, storefront) = setup().await;
    let body = listing(&storefront, "").await;

    assert_eq!(body["status"]["state"], "ready");
    assert_eq!(body["total"], 5);
    assert_eq!(body["count"], 5);
    assert_eq!(ids(&body), ["p1", "p2", "p3", "p4", "p5"]);
}

#[tokio::test]
async fn test_sale_price_is_effective_price() {
    let (_api, storefront) = setup().await;
    let body = listing(&storefront, "?search=skillet").await;

    let skillet = &body["products"][0];
    let effective: Decimal = skillet["effective_price"].as_str().unwrap().parse().unwrap();
    assert_eq!(effective, Decimal::new(3999, 2));
    assert_eq!(skillet["display_price"], "$39.99");
    assert_eq!(skillet["on_sale"], true);
}

#[tokio::test]
async fn test_out_of_stock_product_is_listed_unavailable() {
    let (_api, storefront) = setup().await;
    let body = listing(&storefront, "?search=wool").await;

    assert_eq!(ids(&body), ["p3"]);
    assert_eq!(body["products"][0]["available"], false);
}

// =============================================================================
// Filters and Sorting
// =============================================================================

#[tokio::test]
async fn test_sort_price_low_uses_effective_price() {
    let (_api, storefront) = setup().await;
    let body = listing(&storefront, "?sort=priceLow").await;
    assert_eq!(ids(&body), ["p1", "p5", "p2", "p3", "p4"]);
}

#[tokio::test]
async fn test_sort_price_high() {
    let (_api, storefront) = setup().await;
    let body = listing(&storefront, "?sort=priceHigh").await;
    assert_eq!(ids(&body), ["p4", "p3", "p2", "p5", "p1"]);
}

#[tokio::test]
async fn test_sort_top_rated() {
    let (_api, storefront) = setup().await;
    let body = listing(&storefront, "?sort=topRated").await;
    assert_eq!(ids(&body), ["p2", "p3", "p1", "p5", "p4"]);
}

#[tokio::test]
async fn test_sort_by_name() {
    let (_api, storefront) = setup().await;

    let body = listing(&storefront, "?sort=nameAZ").await;
    assert_eq!(ids(&body), ["p2", "p1", "p5", "p4", "p3"]);

    let body = listing(&storefront, "?sort=nameZA").await;
    assert_eq!(ids(&body), ["p3", "p4", "p5", "p1", "p2"]);
}

#[tokio::test]
async fn test_price_bracket_bounds_are_inclusive() {
    let (_api, storefront) = setup().await;

    let body = listing(&storefront, "?price=25to50").await;
    assert_eq!(ids(&body), ["p2", "p5"]);
    assert_eq!(body["total"], 5);
    assert_eq!(body["count"], 2);

    let body = listing(&storefront, "?price=under25").await;
    assert_eq!(ids(&body), ["p1"]);
}

#[tokio::test]
async fn test_combined_filters() {
    let (_api, storefront) = setup().await;
    let body = listing(&storefront, "?category=kitchen&price=over100").await;
    assert!(ids(&body).is_empty());

    let body = listing(&storefront, "?category=kitchen&sort=priceHigh").await;
    assert_eq!(ids(&body), ["p2", "p5", "p1"]);
}

#[tokio::test]
async fn test_search_matches_brand_tags_and_description() {
    let (_api, storefront) = setup().await;

    assert_eq!(ids(&listing(&storefront, "?search=HEARTHWOOD").await), ["p4"]);
    assert_eq!(ids(&listing(&storefront, "?search=stoneware").await), ["p1"]);
    // "stone" hits p1's tag and p5's description
    assert_eq!(
        ids(&listing(&storefront, "?search=stone").await),
        ["p1", "p5"]
    );
}

#[tokio::test]
async fn test_unknown_filter_ids_are_rejected() {
    let (_api, storefront) = setup().await;

    for query in ["?price=cheap", "?sort=random"] {
        let resp = storefront
            .client
            .get(storefront.url(&format!("/products{query}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "query {query}");
    }
}

#[tokio::test]
async fn test_filter_options() {
    let (_api, storefront) = setup().await;
    let body: Value = storefront
        .client
        .get(storefront.url("/catalog/filters"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let category_ids: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(category_ids, ["all", "kitchen", "home"]);
    assert_eq!(body["price_ranges"].as_array().unwrap().len(), 5);
    assert_eq!(body["sort_keys"].as_array().unwrap().len(), 6);
    assert_eq!(body["sort_keys"][0]["id"], "featured");
}

// =============================================================================
// Product Detail
// =============================================================================

#[tokio::test]
async fn test_product_detail() {
    let (_api, storefront) = setup().await;

    let resp = storefront
        .client
        .get(storefront.url("/products/p4"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "Oak Side Table");

    let resp = storefront
        .client
        .get(storefront.url("/products/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

// =============================================================================
// Refresh
// =============================================================================

#[tokio::test]
async fn test_refresh_replaces_catalog() {
    let (api, storefront) = setup().await;
    api.set_products(vec![api_product(
        "p9", "Enamel Kettle", "kitchen", 60.0, None, 4, 4.1,
    )]);

    let resp = storefront
        .client
        .post(storefront.url("/catalog/refresh"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 1);

    assert_eq!(ids(&listing(&storefront, "").await), ["p9"]);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_catalog() {
    let (api, storefront) = setup().await;
    api.set_failing(true);

    let resp = storefront
        .client
        .post(storefront.url("/catalog/refresh"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Failed to load products. Please try again.");

    let body = listing(&storefront, "").await;
    assert_eq!(body["status"]["state"], "error");
    assert_eq!(body["total"], 5);
}

#[tokio::test]
async fn test_listing_before_first_fetch_is_empty() {
    let api = StubApi::spawn(sample_products()).await.unwrap();
    let storefront = TestStorefront::spawn(&api).await.unwrap();

    let body = listing(&storefront, "").await;
    assert_eq!(body["status"]["state"], "idle");
    assert_eq!(body["total"], 0);
}

//! Integration tests for Hearthside.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hearthside-integration-tests
//! ```
//!
//! Each test starts two servers on ephemeral ports: a stub of the remote
//! product API ([`StubApi`]) and the storefront itself ([`TestStorefront`])
//! pointed at the stub. Nothing leaves the loopback interface.
//!
//! # Test Categories
//!
//! - `catalog` - Listing, filtering, sorting and refresh
//! - `cart` - Cart mutations and checkout summary
//! - `health` - Liveness and readiness probes

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use hearthside_storefront::config::{LogFormat, ProductApiConfig, StorefrontConfig};
use hearthside_storefront::routes;
use hearthside_storefront::state::AppState;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Catalog served by the stub API unless a test replaces it.
///
/// | id | category | price | sale | stock | rating |
/// |----|----------|-------|------|-------|--------|
/// | p1 | kitchen  | 12.50 |      | 10    | 4.2    |
/// | p2 | kitchen  | 45.00 | 39.99| 3     | 4.8    |
/// | p3 | home     | 89.00 |      | 0     | 4.5    |
/// | p4 | home     | 149.00|      | 2     | 3.9    |
/// | p5 | kitchen  | 25.00 |      | 20    | 4.0    |
#[must_use]
pub fn sample_products() -> Vec<Value> {
    vec![
        api_product("p1", "Ceramic Mug", "kitchen", 12.5, None, 10, 4.2)
            .with("tags", json!(["mug", "stoneware"])),
        api_product("p2", "Cast Iron Skillet", "kitchen", 45.0, Some(39.99), 3, 4.8),
        api_product("p3", "Wool Throw", "home", 89.0, None, 0, 4.5),
        api_product("p4", "Oak Side Table", "home", 149.0, None, 2, 3.9)
            .with("brand", json!("Hearthwood")),
        api_product("p5", "Linen Napkins", "kitchen", 25.0, None, 20, 4.0)
            .with("description", json!("Set of four, stonewashed")),
    ]
}

/// A product document in the remote API's wire shape.
#[must_use]
pub fn api_product(
    id: &str,
    title: &str,
    category: &str,
    price: f64,
    sale_price: Option<f64>,
    total_stock: i64,
    average_review: f64,
) -> Value {
    json!({
        "_id": id,
        "title": title,
        "image": format!("https://cdn.example.com/{id}.jpg"),
        "category": category,
        "price": price,
        "salePrice": sale_price,
        "totalStock": total_stock,
        "averageReview": average_review,
        "isActive": true,
    })
}

/// Builder-style field setter for JSON fixtures.
pub trait WithField {
    /// Set `key` to `value` and return the document.
    #[must_use]
    fn with(self, key: &str, value: Value) -> Self;
}

impl WithField for Value {
    fn with(mut self, key: &str, value: Value) -> Self {
        if let Some(object) = self.as_object_mut() {
            object.insert(key.to_string(), value);
        }
        self
    }
}

/// Stub of the remote product API.
///
/// Serves `GET /api/shop/products/get` and `GET /api/shop/products/{id}`.
/// Switch it into failing mode to make every request return 500.
#[derive(Clone)]
pub struct StubApi {
    /// API root including the `/api` prefix.
    pub base_url: String,
    inner: Arc<StubInner>,
}

struct StubInner {
    products: RwLock<Vec<Value>>,
    failing: AtomicBool,
}

impl StubApi {
    /// Start the stub on an ephemeral port serving `products`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn(products: Vec<Value>) -> std::io::Result<Self> {
        let inner = Arc::new(StubInner {
            products: RwLock::new(products),
            failing: AtomicBool::new(false),
        });

        let app = Router::new()
            .route("/api/shop/products/get", get(stub_list))
            .route("/api/shop/products/{id}", get(stub_show))
            .with_state(Arc::clone(&inner));

        let addr = serve(app).await?;
        Ok(Self {
            base_url: format!("http://{addr}/api"),
            inner,
        })
    }

    /// Make subsequent requests fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Replace the served catalog.
    pub fn set_products(&self, products: Vec<Value>) {
        if let Ok(mut guard) = self.inner.products.write() {
            *guard = products;
        }
    }
}

fn stub_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"success": false, "message": "database unavailable"})),
    )
        .into_response()
}

async fn stub_list(State(inner): State<Arc<StubInner>>) -> Response {
    if inner.failing.load(Ordering::SeqCst) {
        return stub_failure();
    }
    let products = inner
        .products
        .read()
        .map(|guard| guard.clone())
        .unwrap_or_default();
    Json(json!({"success": true, "data": products})).into_response()
}

async fn stub_show(State(inner): State<Arc<StubInner>>, Path(id): Path<String>) -> Response {
    if inner.failing.load(Ordering::SeqCst) {
        return stub_failure();
    }
    let found = inner.products.read().ok().and_then(|guard| {
        guard
            .iter()
            .find(|product| product.get("_id").and_then(Value::as_str) == Some(id.as_str()))
            .cloned()
    });
    match found {
        Some(product) => Json(json!({"success": true, "data": product})).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Product not found!"})),
        )
            .into_response(),
    }
}

/// A running storefront wired to a [`StubApi`].
pub struct TestStorefront {
    /// Storefront root, e.g. `http://127.0.0.1:54321`.
    pub base_url: String,
    /// HTTP client for driving the storefront.
    pub client: reqwest::Client,
    /// Shared state, for inspecting the feed and cart directly.
    pub state: AppState,
}

impl TestStorefront {
    /// Start a storefront against `api` without loading the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is invalid or the listener cannot be
    /// bound.
    pub async fn spawn(api: &StubApi) -> Result<Self, Box<dyn std::error::Error>> {
        let config = test_config(&api.base_url)?;
        let state = AppState::new(config);
        let addr = serve(routes::app(state.clone())).await?;

        Ok(Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            state,
        })
    }

    /// Start a storefront and load the catalog before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if startup fails or the stub rejects the fetch.
    pub async fn spawn_loaded(api: &StubApi) -> Result<Self, Box<dyn std::error::Error>> {
        let storefront = Self::spawn(api).await?;
        storefront
            .state
            .feed()
            .refresh(storefront.state.api())
            .await?;
        Ok(storefront)
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Storefront configuration for tests: $10 shipping, no Sentry.
///
/// # Errors
///
/// Returns an error if `api_base_url` is not an http(s) URL.
pub fn test_config(
    api_base_url: &str,
) -> Result<StorefrontConfig, hearthside_storefront::config::ConfigError> {
    Ok(StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        shipping_rate: Decimal::new(1000, 2),
        log_format: LogFormat::default(),
        product_api: ProductApiConfig::parse(api_base_url)?,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    })
}

async fn serve(app: Router) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

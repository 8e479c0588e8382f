//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Ready once the product catalog has loaded
//!
//! # Catalog
//! GET    /products               - Filtered/sorted listing (?search&category&price&sort)
//! GET    /products/{id}          - Product detail (fetched from the product API)
//! GET    /catalog/filters        - Category, price bracket and sort options
//! POST   /catalog/refresh        - Re-fetch the whole catalog
//!
//! # Cart
//! GET    /cart                   - Cart contents and total
//! GET    /cart/count             - Item count for the header badge
//! POST   /cart/items             - Add one unit of a product
//! PUT    /cart/items/{id}        - Set quantity (0 or less removes)
//! DELETE /cart/items/{id}        - Remove a line
//! DELETE /cart                   - Clear the cart
//!
//! # Checkout
//! GET    /checkout/summary       - Subtotal, shipping and total
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::{Method, StatusCode, header},
    middleware::from_fn,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::{make_request_span, request_id_middleware};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/filters", get(products::filters))
        .route("/refresh", post(products::refresh))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/count", get(cart::count))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::update).delete(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/products", product_routes())
        .nest("/catalog", catalog_routes())
        .nest("/cart", cart_routes())
        .route("/checkout/summary", get(cart::summary))
}

/// Build the full application with middleware and state attached.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(from_fn(request_id_middleware))
                .layer(cors),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the product catalog has loaded.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.feed().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

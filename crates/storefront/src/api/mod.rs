//! Remote product API client.
//!
//! # Architecture
//!
//! - The remote API is the source of truth for products - NO local sync
//! - One call fetches the whole catalog; there is no pagination
//! - No retry, no backoff, no timeout: a failed fetch is reported to the caller,
//!   which decides whether to try again
//!
//! # Endpoints
//!
//! - `GET {base}/shop/products/get` - `{ success, data: Product[] }`
//! - `GET {base}/shop/products/{id}` - `{ success, data: Product }`
//!
//! # Example
//!
//! ```rust,ignore
//! use hearthside_storefront::api::ProductApiClient;
//!
//! let client = ProductApiClient::new(&config.product_api);
//! let products = client.fetch_products().await?;
//! ```

mod client;
pub mod types;

pub use client::ProductApiClient;
pub use types::{ApiProduct, ApiResponse};

use thiserror::Error;

/// Longest response body excerpt kept in errors and logs.
const BODY_EXCERPT_CHARS: usize = 200;

/// Errors that can occur when talking to the product API.
///
/// Callers treat every variant the same way (surface and allow a retry); the
/// variants only exist to make logs useful.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("Product API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON envelope.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Envelope came back with `success: false`.
    #[error("Product API reported failure for {0}")]
    Unsuccessful(String),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid product API URL: {0}")]
    InvalidUrl(String),
}

/// First few characters of a response body, for diagnostics.
fn body_excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

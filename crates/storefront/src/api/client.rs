//! Product API client implementation.

use std::sync::Arc;

use hearthside_core::{Product, ProductId};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::types::{ApiProduct, ApiResponse};
use super::{ApiError, body_excerpt};
use crate::config::ProductApiConfig;

const PRODUCTS_PATH: &str = "shop/products/get";

// =============================================================================
// ProductApiClient
// =============================================================================

/// Client for the remote product API.
///
/// Cheaply cloneable; clones share the underlying connection pool.
#[derive(Clone)]
pub struct ProductApiClient {
    inner: Arc<ProductApiClientInner>,
}

struct ProductApiClientInner {
    client: reqwest::Client,
    config: ProductApiConfig,
}

impl std::fmt::Debug for ProductApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductApiClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ProductApiClient {
    /// Create a new product API client.
    #[must_use]
    pub fn new(config: &ProductApiConfig) -> Self {
        Self {
            inner: Arc::new(ProductApiClientInner {
                client: reqwest::Client::new(),
                config: config.clone(),
            }),
        }
    }

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, a non-2xx status, an
    /// unparseable body or a `success: false` envelope.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.inner.config.endpoint(PRODUCTS_PATH);
        let envelope = self.get::<Vec<ApiProduct>>(&url).await?;

        if !envelope.success {
            return Err(ApiError::Unsuccessful(url));
        }

        let products: Vec<Product> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Product::from)
            .collect();

        debug!(count = products.len(), "Fetched product catalog");
        Ok(products)
    }

    /// Fetch a single product.
    ///
    /// Returns `Ok(None)` when the API answers 404 or `success: false`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, other non-2xx statuses or an
    /// unparseable body.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, ApiError> {
        let url = self.product_url(id)?;
        let envelope = match self.get::<ApiProduct>(&url).await {
            Err(ApiError::Status { status: 404, .. }) => return Ok(None),
            other => other?,
        };

        if !envelope.success {
            debug!("Product not found");
            return Ok(None);
        }

        Ok(envelope.data.map(Product::from))
    }

    /// Build `{base}/shop/products/{id}` with the id percent-encoded as a
    /// single path segment.
    fn product_url(&self, id: &ProductId) -> Result<String, ApiError> {
        let mut url = self.inner.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.config.base_url.to_string()))?
            .pop_if_empty()
            .extend(["shop", "products", id.as_str()]);
        Ok(url.into())
    }

    /// Issue a GET and decode the response envelope.
    ///
    /// Non-2xx responses become `ApiError::Status` with a body excerpt.
    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self
            .inner
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body_excerpt(&response_text),
                "Product API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body_excerpt(&response_text),
            });
        }

        let envelope: ApiResponse<T> = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body_excerpt(&response_text),
                    "Failed to parse product API response"
                );
                return Err(ApiError::Parse(e));
            }
        };

        Ok(envelope)
    }
}

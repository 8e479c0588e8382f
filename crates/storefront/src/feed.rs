//! In-memory product feed.
//!
//! Holds the full catalog fetched from the remote API together with the
//! status of the most recent fetch. The list is published as an `Arc` snapshot
//! and swapped in one step, so readers see either the old list or the new one,
//! never a partial merge.
//!
//! Fetches are not de-duplicated: two overlapping refreshes both hit the API
//! and the one that finishes last wins.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use hearthside_core::{Product, ProductId};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, ProductApiClient};

/// Status of the most recent fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum FeedStatus {
    /// No fetch has been started yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Ready,
    /// The last fetch failed; carries a user-facing message.
    Error(String),
}

/// A consistent view of the feed at one point in time.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub status: FeedStatus,
    pub products: Arc<Vec<Product>>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl FeedSnapshot {
    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }
}

#[derive(Debug)]
struct FeedInner {
    status: FeedStatus,
    products: Arc<Vec<Product>>,
    fetched_at: Option<DateTime<Utc>>,
}

/// Shared product feed.
#[derive(Debug)]
pub struct ProductFeed {
    inner: RwLock<FeedInner>,
}

impl Default for ProductFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductFeed {
    /// Create an empty, idle feed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(FeedInner {
                status: FeedStatus::Idle,
                products: Arc::new(Vec::new()),
                fetched_at: None,
            }),
        }
    }

    /// Current status and product list.
    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        FeedSnapshot {
            status: inner.status.clone(),
            products: Arc::clone(&inner.products),
            fetched_at: inner.fetched_at,
        }
    }

    /// Whether the last fetch succeeded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.snapshot().status == FeedStatus::Ready
    }

    /// Enter the loading state. The current list stays visible.
    pub fn begin_fetch(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.status = FeedStatus::Loading;
    }

    /// Publish a successful fetch, replacing the whole list.
    pub fn complete(&self, products: Vec<Product>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.products = Arc::new(products);
        inner.status = FeedStatus::Ready;
        inner.fetched_at = Some(Utc::now());
    }

    /// Record a failed fetch. The previous list is left untouched.
    pub fn fail(&self, message: impl Into<String>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.status = FeedStatus::Error(message.into());
    }

    /// Fetch the catalog and publish the outcome.
    ///
    /// Returns the number of products on success.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` from the fetch after recording it in the feed
    /// status.
    #[instrument(skip_all)]
    pub async fn refresh(&self, client: &ProductApiClient) -> Result<usize, ApiError> {
        self.begin_fetch();

        match client.fetch_products().await {
            Ok(products) => {
                let count = products.len();
                self.complete(products);
                info!(count, "Product catalog loaded");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load product catalog");
                self.fail("Failed to load products. Please try again.");
                Err(e)
            }
        }
    }
}

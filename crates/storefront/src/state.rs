//! Application state shared across handlers.
//!
//! The storefront serves a single shopping session: one product feed and one
//! cart, created at startup and passed explicitly to every handler.

use std::sync::{Arc, Mutex, PoisonError};

use hearthside_core::{CartState, CartStore};

use crate::api::ProductApiClient;
use crate::config::StorefrontConfig;
use crate::feed::ProductFeed;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the product API client, the product feed and the cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ProductApiClient,
    feed: ProductFeed,
    cart: Mutex<CartStore>,
}

impl AppState {
    /// Create a new application state with an idle feed and an empty cart.
    ///
    /// A cart listener is registered that logs every cart change.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let api = ProductApiClient::new(&config.product_api);

        let mut cart = CartStore::new();
        cart.subscribe(|state| {
            tracing::info!(
                lines = state.items.len(),
                items = state.item_count(),
                total = %state.total,
                "Cart updated"
            );
        });

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                feed: ProductFeed::new(),
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product API client.
    #[must_use]
    pub fn api(&self) -> &ProductApiClient {
        &self.inner.api
    }

    /// Get a reference to the product feed.
    #[must_use]
    pub fn feed(&self) -> &ProductFeed {
        &self.inner.feed
    }

    /// Run a closure with exclusive access to the cart store.
    ///
    /// Cart listeners run inside the closure, so they must not call back
    /// into `with_cart`.
    pub fn with_cart<R>(&self, f: impl FnOnce(&mut CartStore) -> R) -> R {
        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Copy of the current cart contents.
    #[must_use]
    pub fn cart(&self) -> CartState {
        self.with_cart(|cart| cart.state().clone())
    }

    /// Fetch the catalog in the background.
    ///
    /// Fire-and-forget: the outcome is logged and recorded in the feed
    /// status, where `/health/ready` and `/products` pick it up.
    pub fn start_catalog_fetch(&self) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            if let Err(e) = state.feed().refresh(state.api()).await {
                tracing::debug!(
                    error = %e,
                    "Initial catalog fetch failed; waiting for manual refresh"
                );
            }
        })
    }
}

//! Shopping cart store.
//!
//! A single ordered collection of line items with a derived total. Every
//! operation is a total function over the current state: there are no error
//! conditions, unknown ids are ignored and a quantity that drops to zero removes
//! the line.
//!
//! Observers register with [`CartStore::subscribe`] and are called
//! synchronously with the new state after each operation that changed it.
//!
//! # Example
//!
//! ```rust
//! use hearthside_core::{CartStore, NewCartItem, ProductId};
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartStore::new();
//! let mug = NewCartItem {
//!     id: ProductId::new("mug"),
//!     name: "Ceramic Mug".to_string(),
//!     unit_price: Decimal::from(10),
//!     image: String::new(),
//! };
//!
//! cart.add_item(mug.clone());
//! cart.add_item(mug);
//!
//! assert_eq!(cart.state().items.len(), 1);
//! assert_eq!(cart.state().total, Decimal::from(20));
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// Largest quantity a single line can hold.
pub const MAX_LINE_QUANTITY: u32 = 9_999;

/// One cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub image: String,
    /// Always at least 1 while the item is in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Product data needed to put something in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub image: String,
}

impl From<&Product> for NewCartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.title.clone(),
            unit_price: product.effective_price(),
            image: product.image.clone(),
        }
    }
}

/// Snapshot of the cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Line items in insertion order.
    pub items: Vec<CartItem>,
    /// Sum of line totals.
    pub total: Decimal,
}

impl CartState {
    /// Recompute the total from the items.
    #[must_use]
    pub fn computed_total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn item(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Order summary with a flat shipping charge.
    #[must_use]
    pub fn summary(&self, shipping: Decimal) -> CheckoutSummary {
        CheckoutSummary {
            subtotal: self.total,
            shipping,
            total: self.total + shipping,
            item_count: self.item_count(),
        }
    }
}

/// Checkout order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: u64,
}

impl CheckoutSummary {
    /// `(subtotal, shipping, total)` formatted for display.
    #[must_use]
    pub fn display(&self) -> (String, String, String) {
        (
            Price::usd(self.subtotal).display(),
            Price::usd(self.shipping).display(),
            Price::usd(self.total).display(),
        )
    }
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&CartState) + Send + Sync>;

/// Cart state plus its subscribers.
#[derive(Default)]
pub struct CartStore {
    state: CartState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing state.
    ///
    /// The total is recomputed from the items, zero-quantity lines are
    /// dropped and oversized lines are clamped to [`MAX_LINE_QUANTITY`].
    #[must_use]
    pub fn with_state(mut state: CartState) -> Self {
        state.items.retain(|item| item.quantity > 0);
        for item in &mut state.items {
            item.quantity = item.quantity.min(MAX_LINE_QUANTITY);
        }
        state.total = state.computed_total();
        Self {
            state,
            ..Self::default()
        }
    }

    /// Current cart contents.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    /// Register a listener that receives the new state after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Add one unit of a product.
    ///
    /// Increments the quantity when the product is already in the cart,
    /// otherwise appends a new line with quantity 1.
    pub fn add_item(&mut self, item: impl Into<NewCartItem>) {
        let item = item.into();
        if let Some(existing) = self.state.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing
                .quantity
                .saturating_add(1)
                .min(MAX_LINE_QUANTITY);
        } else {
            self.state.items.push(CartItem {
                id: item.id,
                name: item.name,
                unit_price: item.unit_price,
                image: item.image,
                quantity: 1,
            });
        }
        self.commit();
    }

    /// Set the quantity of a line. Zero or negative removes it.
    ///
    /// Quantities are not capped against remote stock, only clamped to
    /// [`MAX_LINE_QUANTITY`].
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        let quantity = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(MAX_LINE_QUANTITY);
        let Some(existing) = self.state.items.iter_mut().find(|i| &i.id == id) else {
            return;
        };
        if existing.quantity == quantity {
            return;
        }
        existing.quantity = quantity;
        self.commit();
    }

    /// Remove a line if present.
    pub fn remove_item(&mut self, id: &ProductId) {
        let before = self.state.items.len();
        self.state.items.retain(|item| &item.id != id);
        if self.state.items.len() != before {
            self.commit();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if self.state.is_empty() {
            return;
        }
        self.state.items.clear();
        self.commit();
    }

    fn commit(&mut self) {
        self.state.total = self.state.computed_total();
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}

//! Hearthside Core - Storefront domain library.
//!
//! This crate provides the pure storefront logic used by the other
//! Hearthside components:
//! - `storefront` - JSON service backing the shop UI
//! - `cli` - Command-line catalog browser
//!
//! # Architecture
//!
//! The core crate contains only types and deterministic transformations - no I/O,
//! no HTTP clients, no async. Everything here is a plain function over in-memory
//! data, which keeps it trivially testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and prices
//! - [`product`] - Read-only product model (effective price, availability)
//! - [`cart`] - Cart store with subscription interface
//! - [`catalog`] - Filter/sort pipeline for the product listing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod product;
pub mod types;

pub use cart::{
    CartItem, CartState, CartStore, CheckoutSummary, MAX_LINE_QUANTITY, NewCartItem, SubscriptionId,
};
pub use catalog::{CategoryFilter, FilterParseError, FilterState, PriceRange, SortKey};
pub use product::Product;
pub use types::*;

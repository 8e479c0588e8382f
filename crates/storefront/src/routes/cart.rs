//! Cart route handlers.
//!
//! The cart lives in `AppState` for the lifetime of the process. Products are
//! added by id and resolved against the loaded catalog, so the cart only ever
//! holds products the shop actually lists.

use axum::{
    Json,
    extract::{Path, State},
};
use hearthside_core::{CartItem, CartState, CheckoutSummary, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Decimal,
    pub subtotal: String,
    pub item_count: u64,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total(),
            price: Price::usd(item.unit_price).display(),
            line_price: Price::usd(item.line_total()).display(),
        }
    }
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            total: cart.total,
            subtotal: Price::usd(cart.total).display(),
            item_count: cart.item_count(),
        }
    }
}

/// Checkout summary display data.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: u64,
    pub display_subtotal: String,
    pub display_shipping: String,
    pub display_total: String,
}

impl From<CheckoutSummary> for SummaryView {
    fn from(summary: CheckoutSummary) -> Self {
        let (display_subtotal, display_shipping, display_total) = summary.display();
        Self {
            subtotal: summary.subtotal,
            shipping: summary.shipping,
            total: summary.total,
            item_count: summary.item_count,
            display_subtotal,
            display_shipping,
            display_total,
        }
    }
}

/// Cart count badge.
#[derive(Debug, Serialize)]
pub struct CountView {
    pub count: u64,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Display cart contents.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from(&state.cart()))
}

/// Get cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CountView> {
    let count = state.with_cart(|cart| cart.item_count());
    Json(CountView { count })
}

/// Add one unit of a product.
///
/// The product must be in the loaded catalog (404 otherwise) and available
/// (409 otherwise). Quantity is not capped at the remote stock count.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let snapshot = state.feed().snapshot();
    let product = snapshot
        .find(&request.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    if !product.is_available() {
        return Err(AppError::Unavailable(format!(
            "{} is out of stock",
            product.title
        )));
    }

    let view = state.with_cart(|cart| {
        cart.add_item(product);
        CartView::from(cart.state())
    });
    Ok(Json(view))
}

/// Set the quantity of a line; zero or less removes it.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Json<CartView> {
    let id = ProductId::new(id);
    Json(state.with_cart(|cart| {
        cart.update_quantity(&id, request.quantity);
        CartView::from(cart.state())
    }))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Json<CartView> {
    let id = ProductId::new(id);
    Json(state.with_cart(|cart| {
        cart.remove_item(&id);
        CartView::from(cart.state())
    }))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    Json(state.with_cart(|cart| {
        cart.clear();
        CartView::from(cart.state())
    }))
}

/// Order summary with the configured flat shipping rate.
#[instrument(skip(state))]
pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryView>> {
    let cart = state.cart();
    if cart.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".to_string()));
    }
    Ok(Json(SummaryView::from(
        cart.summary(state.config().shipping_rate),
    )))
}

//! Wire types for the product API.
//!
//! These mirror the JSON the remote service returns and are converted into
//! the core [`Product`] immediately after parsing, so nothing else in the
//! storefront depends on the wire shape.

use chrono::{DateTime, Utc};
use hearthside_core::{CategoryId, Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response envelope used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
}

/// A product as sent by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProduct {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub image: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub total_stock: i64,
    #[serde(default)]
    pub average_review: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn default_active() -> bool {
    true
}

impl From<ApiProduct> for Product {
    fn from(api: ApiProduct) -> Self {
        Self {
            id: ProductId::new(api.id),
            title: api.title,
            description: api.description,
            image: api.image,
            category: CategoryId::new(api.category),
            brand: api.brand,
            tags: api.tags,
            price: api.price,
            sale_price: api.sale_price,
            stock_count: u32::try_from(api.total_stock.max(0)).unwrap_or(u32::MAX),
            active: api.is_active,
            rating: api.average_review,
            created_at: api.created_at,
            updated_at: api.updated_at,
        }
    }
}

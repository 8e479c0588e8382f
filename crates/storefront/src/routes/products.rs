//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use hearthside_core::catalog::{self, ALL};
use hearthside_core::{FilterState, PriceRange, Product, ProductId, SortKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::feed::FeedStatus;
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub brand: String,
    pub tags: Vec<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub effective_price: Decimal,
    pub display_price: String,
    pub on_sale: bool,
    pub available: bool,
    pub stock_count: u32,
    pub rating: f64,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            category: product.category.to_string(),
            brand: product.brand.clone(),
            tags: product.tags.clone(),
            price: product.price,
            sale_price: product.sale_price,
            effective_price: product.effective_price(),
            display_price: product.display_price(),
            on_sale: product.is_on_sale(),
            available: product.is_available(),
            stock_count: product.stock_count,
            rating: product.rating,
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub sort: Option<String>,
}

impl CatalogQuery {
    fn filter_state(&self) -> std::result::Result<FilterState, hearthside_core::FilterParseError> {
        FilterState::parse(
            self.search.as_deref(),
            self.category.as_deref(),
            self.price.as_deref(),
            self.sort.as_deref(),
        )
    }
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    /// Status of the latest catalog fetch.
    pub status: FeedStatus,
    /// Size of the full catalog before filtering.
    pub total: usize,
    /// Number of products after filtering.
    pub count: usize,
    pub products: Vec<ProductView>,
}

/// A selectable filter value.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
}

/// Filter options for the listing UI.
#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub categories: Vec<FilterOption>,
    pub price_ranges: Vec<FilterOption>,
    pub sort_keys: Vec<FilterOption>,
}

/// Result of a manual catalog refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub status: FeedStatus,
    pub count: usize,
}

/// Display the filtered, sorted product listing.
///
/// Always answers 200 with the feed status so the UI can render loading
/// and error states; an unknown price bracket or sort id is a 400.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>> {
    let filter = query.filter_state()?;
    let snapshot = state.feed().snapshot();

    let products: Vec<ProductView> = filter
        .apply(&snapshot.products)
        .into_iter()
        .map(ProductView::from)
        .collect();

    Ok(Json(CatalogResponse {
        status: snapshot.status,
        total: snapshot.products.len(),
        count: products.len(),
        products,
    }))
}

/// Display a single product, fetched fresh from the product API.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ProductView>> {
    let id = ProductId::new(id);
    let product = state
        .api()
        .fetch_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(ProductView::from(&product)))
}

/// List filter options.
///
/// Categories come from the loaded catalog, in first-seen order.
#[instrument(skip(state))]
pub async fn filters(State(state): State<AppState>) -> Json<FiltersResponse> {
    let snapshot = state.feed().snapshot();

    let categories = std::iter::once(FilterOption {
        id: ALL.to_string(),
        label: "All Categories".to_string(),
    })
    .chain(
        catalog::categories(&snapshot.products)
            .into_iter()
            .map(|category| FilterOption {
                label: category_label(category.as_str()),
                id: category.into_inner(),
            }),
    )
    .collect();

    let price_ranges = PriceRange::ALL
        .into_iter()
        .map(|range| FilterOption {
            id: range.id().to_string(),
            label: range.label().to_string(),
        })
        .collect();

    let sort_keys = SortKey::ALL
        .into_iter()
        .map(|key| FilterOption {
            id: key.id().to_string(),
            label: key.label().to_string(),
        })
        .collect();

    Json(FiltersResponse {
        categories,
        price_ranges,
        sort_keys,
    })
}

/// Re-fetch the whole catalog (manual retry).
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>> {
    let count = state.feed().refresh(state.api()).await?;
    Ok(Json(RefreshResponse {
        status: state.feed().snapshot().status,
        count,
    }))
}

/// Title-case a category id for display ("home-decor" -> "Home Decor").
fn category_label(id: &str) -> String {
    id.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label() {
        assert_eq!(category_label("kitchen"), "Kitchen");
        assert_eq!(category_label("home-decor"), "Home Decor");
        assert_eq!(category_label("bath_and_body"), "Bath And Body");
        assert_eq!(category_label(""), "");
    }

    #[test]
    fn test_catalog_query_defaults() {
        let filter = CatalogQuery::default().filter_state().unwrap();
        assert_eq!(filter, FilterState::default());
    }

    #[test]
    fn test_catalog_query_rejects_unknown_sort() {
        let query = CatalogQuery {
            sort: Some("cheapest".to_string()),
            ..CatalogQuery::default()
        };
        assert!(query.filter_state().is_err());
    }
}

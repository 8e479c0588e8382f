//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! hs-cli products --search bowl --sort priceLow
//! hs-cli product 65f1c2a9e4b0
//! hs-cli filters
//! ```
//!
//! # Environment Variables
//!
//! - `PRODUCT_API_BASE_URL` - Remote product API root (optional)

use hearthside_core::{FilterParseError, FilterState, PriceRange, Product, ProductId, SortKey};
use hearthside_storefront::api::{ApiError, ProductApiClient};
use hearthside_storefront::config::{ConfigError, ProductApiConfig};
use thiserror::Error;

/// Errors that can occur while browsing the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Product API call failed.
    #[error("Product API error: {0}")]
    Api(#[from] ApiError),

    /// Unknown price bracket or sort id.
    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterParseError),

    /// Product does not exist.
    #[error("Product not found: {0}")]
    NotFound(String),
}

/// Listing options from the command line.
#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub category: String,
    pub price: String,
    pub sort: String,
}

impl ListingQuery {
    fn filter_state(&self) -> Result<FilterState, FilterParseError> {
        FilterState::parse(
            self.search.as_deref(),
            Some(&self.category),
            Some(&self.price),
            Some(&self.sort),
        )
    }
}

fn client() -> Result<ProductApiClient, CatalogError> {
    let config = ProductApiConfig::from_env()?;
    Ok(ProductApiClient::new(&config))
}

/// One-line summary of a product.
fn describe(product: &Product) -> String {
    let mut line = format!(
        "{} | {} | {} | {}",
        product.id,
        product.title,
        product.display_price(),
        product.category
    );
    if product.is_on_sale() {
        line.push_str(" | on sale");
    }
    if !product.is_available() {
        line.push_str(" | out of stock");
    }
    line
}

/// Fetch the catalog and print the filtered listing.
///
/// Filter ids are validated before any network call.
pub async fn list(query: &ListingQuery) -> Result<(), CatalogError> {
    let filter = query.filter_state()?;
    let client = client()?;

    tracing::info!("Fetching product catalog...");
    let products = client.fetch_products().await?;
    let listing = filter.apply(&products);

    tracing::info!(
        "{} of {} products match (sort: {}, price: {}, category: {})",
        listing.len(),
        products.len(),
        filter.sort,
        filter.price_range,
        filter.category
    );
    for product in listing {
        tracing::info!("  {}", describe(product));
    }
    Ok(())
}

/// Fetch and print one product.
pub async fn show(id: &str) -> Result<(), CatalogError> {
    let client = client()?;
    let product = client
        .fetch_product(&ProductId::new(id))
        .await?
        .ok_or_else(|| CatalogError::NotFound(id.to_owned()))?;

    tracing::info!("{}", describe(&product));
    if !product.brand.is_empty() {
        tracing::info!("  Brand: {}", product.brand);
    }
    if !product.description.is_empty() {
        tracing::info!("  {}", product.description);
    }
    tracing::info!(
        "  Stock: {} | Rating: {:.1}",
        product.stock_count,
        product.rating
    );
    Ok(())
}

/// Print the price bracket and sort ids accepted by `products`.
pub fn filters() {
    tracing::info!("Price brackets:");
    for range in PriceRange::ALL {
        tracing::info!("  {:<10} {}", range.id(), range.label());
    }
    tracing::info!("Sort keys:");
    for key in SortKey::ALL {
        tracing::info!("  {:<10} {}", key.id(), key.label());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hearthside_core::CategoryId;
    use rust_decimal::Decimal;

    use super::*;

    fn query(price: &str, sort: &str) -> ListingQuery {
        ListingQuery {
            search: None,
            category: "all".to_string(),
            price: price.to_string(),
            sort: sort.to_string(),
        }
    }

    #[test]
    fn test_listing_query_parses_ids() {
        let filter = query("50to100", "topRated").filter_state().unwrap();
        assert_eq!(filter.price_range, PriceRange::From50To100);
        assert_eq!(filter.sort, SortKey::TopRated);
    }

    #[test]
    fn test_listing_query_rejects_unknown_ids() {
        assert!(matches!(
            query("cheap", "featured").filter_state(),
            Err(FilterParseError::PriceRange(_))
        ));
    }

    #[test]
    fn test_describe_flags_sale_and_stock() {
        let product = Product {
            id: ProductId::new("p1"),
            title: "Leather Journal".to_string(),
            description: String::new(),
            image: String::new(),
            category: CategoryId::new("stationery"),
            brand: String::new(),
            tags: Vec::new(),
            price: Decimal::new(2999, 2),
            sale_price: Some(Decimal::new(1999, 2)),
            stock_count: 0,
            active: true,
            rating: 4.7,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(
            describe(&product),
            "p1 | Leather Journal | $19.99 | stationery | on sale | out of stock"
        );
    }
}

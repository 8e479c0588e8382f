//! Read-only product model.
//!
//! Products come from the remote catalog API and are never mutated by the
//! storefront. The two derived properties the rest of the system relies on are
//! the effective price (sale price when it actually undercuts the list price)
//! and availability (in stock and active).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image: String,
    pub category: CategoryId,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// List price.
    pub price: Decimal,
    /// Discounted price, if the product is on sale.
    pub sale_price: Option<Decimal>,
    pub stock_count: u32,
    pub active: bool,
    /// Average review score.
    pub rating: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price the customer actually pays.
    ///
    /// The sale price wins only when it is positive and strictly lower than the
    /// list price; a zero sale price means "not on sale".
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.sale_price {
            Some(sale) if sale > Decimal::ZERO && sale < self.price => sale,
            _ => self.price,
        }
    }

    /// Whether the product is discounted.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.effective_price() < self.price
    }

    /// In stock and active.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.stock_count > 0 && self.active
    }

    /// Effective price formatted for display.
    #[must_use]
    pub fn display_price(&self) -> String {
        Price::usd(self.effective_price()).display()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build an active, in-stock product with sensible defaults.
    pub fn product(id: &str, title: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            description: String::new(),
            image: format!("/images/{id}.jpg"),
            category: CategoryId::new("home"),
            brand: String::new(),
            tags: Vec::new(),
            price,
            sale_price: None,
            stock_count: 5,
            active: true,
            rating: 0.0,
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::product;
    use super::*;

    #[test]
    fn test_effective_price_prefers_lower_sale_price() {
        let mut p = product("1", "Bowl", Decimal::from(40));
        p.sale_price = Some(Decimal::from(30));
        assert_eq!(p.effective_price(), Decimal::from(30));
        assert!(p.is_on_sale());
    }

    #[test]
    fn test_effective_price_ignores_higher_or_zero_sale_price() {
        let mut p = product("1", "Bowl", Decimal::from(40));
        p.sale_price = Some(Decimal::from(45));
        assert_eq!(p.effective_price(), Decimal::from(40));

        p.sale_price = Some(Decimal::ZERO);
        assert_eq!(p.effective_price(), Decimal::from(40));
        assert!(!p.is_on_sale());
    }

    #[test]
    fn test_availability_requires_stock_and_active() {
        let mut p = product("1", "Bowl", Decimal::from(40));
        assert!(p.is_available());

        p.stock_count = 0;
        assert!(!p.is_available());

        p.stock_count = 3;
        p.active = false;
        assert!(!p.is_available());
    }

    #[test]
    fn test_display_price() {
        let mut p = product("1", "Journal", Decimal::new(2999, 2));
        assert_eq!(p.display_price(), "$29.99");
        p.sale_price = Some(Decimal::new(1999, 2));
        assert_eq!(p.display_price(), "$19.99");
    }
}

//! Client-side catalog pipeline.
//!
//! Narrows and orders the full product list for display. The steps run in a
//! fixed order: text search, category, price bracket, then sort. The pipeline
//! is pure and cheap enough to be re-run in full whenever an input changes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::product::Product;
use crate::types::CategoryId;

/// Identifier meaning "do not filter on this dimension".
pub const ALL: &str = "all";

/// A filter or sort id that the pipeline does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterParseError {
    #[error("unknown price range: {0}")]
    PriceRange(String),
    #[error("unknown sort key: {0}")]
    SortKey(String),
}

// =============================================================================
// Category
// =============================================================================

/// Category selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => &product.category == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value.is_empty() || value == ALL {
            Self::All
        } else {
            Self::Only(CategoryId::new(value))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

// =============================================================================
// Price brackets
// =============================================================================

/// Fixed price brackets evaluated against the effective price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "under25")]
    Under25,
    #[serde(rename = "25to50")]
    From25To50,
    #[serde(rename = "50to100")]
    From50To100,
    #[serde(rename = "over100")]
    Over100,
}

impl PriceRange {
    /// Every bracket, in display order.
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Under25,
        Self::From25To50,
        Self::From50To100,
        Self::Over100,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::Under25 => "under25",
            Self::From25To50 => "25to50",
            Self::From50To100 => "50to100",
            Self::Over100 => "over100",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Prices",
            Self::Under25 => "Under $25",
            Self::From25To50 => "$25 to $50",
            Self::From50To100 => "$50 to $100",
            Self::Over100 => "Over $100",
        }
    }

    /// Whether a price falls inside the bracket.
    ///
    /// Boundaries: `under25` is exclusive at 25, `25to50` includes both ends,
    /// `50to100` excludes 50 and includes 100, `over100` excludes 100.
    #[must_use]
    pub fn contains(self, price: Decimal) -> bool {
        let p25 = Decimal::from(25);
        let p50 = Decimal::from(50);
        let p100 = Decimal::from(100);
        match self {
            Self::All => true,
            Self::Under25 => price < p25,
            Self::From25To50 => price >= p25 && price <= p50,
            Self::From50To100 => price > p50 && price <= p100,
            Self::Over100 => price > p100,
        }
    }
}

impl FromStr for PriceRange {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::All);
        }
        Self::ALL
            .into_iter()
            .find(|range| range.id() == s)
            .ok_or_else(|| FilterParseError::PriceRange(s.to_string()))
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Input order.
    #[default]
    #[serde(rename = "featured")]
    Featured,
    #[serde(rename = "priceLow")]
    PriceLow,
    #[serde(rename = "priceHigh")]
    PriceHigh,
    #[serde(rename = "nameAZ")]
    NameAz,
    #[serde(rename = "nameZA")]
    NameZa,
    #[serde(rename = "topRated")]
    TopRated,
}

impl SortKey {
    pub const ALL: [Self; 6] = [
        Self::Featured,
        Self::PriceLow,
        Self::PriceHigh,
        Self::NameAz,
        Self::NameZa,
        Self::TopRated,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "priceLow",
            Self::PriceHigh => "priceHigh",
            Self::NameAz => "nameAZ",
            Self::NameZa => "nameZA",
            Self::TopRated => "topRated",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::NameAz => "Name: A to Z",
            Self::NameZa => "Name: Z to A",
            Self::TopRated => "Top Rated",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Featured => Ordering::Equal,
            Self::PriceLow => a.effective_price().cmp(&b.effective_price()),
            Self::PriceHigh => b.effective_price().cmp(&a.effective_price()),
            Self::NameAz => compare_names(&a.title, &b.title),
            Self::NameZa => compare_names(&b.title, &a.title),
            Self::TopRated => b.rating.total_cmp(&a.rating),
        }
    }
}

impl FromStr for SortKey {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::Featured);
        }
        Self::ALL
            .into_iter()
            .find(|key| key.id() == s)
            .ok_or_else(|| FilterParseError::SortKey(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Human-friendly name ordering in three levels: base letters (accents and
/// case folded away), then accents, then case with lowercase first. "Écru"
/// sorts between "Apple" and "Zebra"; "apple" sorts just before "Apple".
fn compare_names(a: &str, b: &str) -> Ordering {
    fold_name(a)
        .cmp(&fold_name(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Compatibility-decompose, drop combining marks, lowercase.
fn fold_name(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

// =============================================================================
// Pipeline
// =============================================================================

/// User-chosen listing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_text: String,
    pub category: CategoryFilter,
    pub price_range: PriceRange,
    pub sort: SortKey,
}

impl FilterState {
    /// Build from raw query-string values. Missing values mean "all"/"featured".
    ///
    /// # Errors
    ///
    /// Returns `FilterParseError` for an unknown price bracket or sort id.
    pub fn parse(
        search: Option<&str>,
        category: Option<&str>,
        price_range: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Self, FilterParseError> {
        Ok(Self {
            search_text: search.unwrap_or_default().to_string(),
            category: CategoryFilter::from(category.unwrap_or(ALL)),
            price_range: price_range.unwrap_or(ALL).parse()?,
            sort: sort.unwrap_or_default().parse()?,
        })
    }

    /// Run the pipeline over `products`.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let needle = self.search_text.to_lowercase();

        let mut result: Vec<&Product> = products
            .iter()
            .filter(|p| needle.is_empty() || matches_text(p, &needle))
            .filter(|p| self.category.matches(p))
            .filter(|p| self.price_range.contains(p.effective_price()))
            .collect();

        if self.sort != SortKey::Featured {
            // `sort_by` is stable, so ties keep their input order.
            result.sort_by(|a, b| self.sort.compare(a, b));
        }

        result
    }
}

/// Case-insensitive substring match on title, description, brand or any tag.
fn matches_text(product: &Product, needle: &str) -> bool {
    let hit = |field: &str| field.to_lowercase().contains(needle);
    hit(&product.title)
        || hit(&product.description)
        || hit(&product.brand)
        || product.tags.iter().any(|tag| hit(tag))
}

/// Distinct categories in first-seen order. Uncategorised products are skipped.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<CategoryId> {
    let mut seen: Vec<CategoryId> = Vec::new();
    for product in products {
        if product.category.as_str().is_empty() {
            continue;
        }
        if !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

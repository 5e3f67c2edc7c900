//! # Catalog Module
//!
//! Product browsing: filtering, sorting and pagination of the product list.
//!
//! ## Browse Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products ──► ProductFilter::matches ──► SortOrder (stable) ──► paginate│
//! │                                                                         │
//! │  "Showing 5 of 12 products"         page 1 of 1, 8 per page            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here borrows the caller's product slice; nothing is cloned
//! until a product is turned into a cart line.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::LineItem;

// =============================================================================
// Product
// =============================================================================

/// A product as listed in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Catalog id; higher ids are newer listings.
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Current selling price.
    pub price: Money,
    /// Pre-sale price, shown struck through.
    #[serde(default)]
    pub original_price: Option<Money>,
    /// Star rating, 0–5.
    pub rating: u8,
    pub reviews: u32,
    pub category: String,
    pub brand: String,
    pub stock: u32,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub free_shipping: bool,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whole-percent markdown from the original price, for the "% OFF" badge.
    ///
    /// Rounds half up. Returns `None` without a positive original price, or
    /// when the product is priced above it.
    pub fn percent_off(&self) -> Option<u32> {
        let original = self.original_price.filter(Money::is_positive)?;
        let ratio = self.price.amount() / original.amount();
        ((Decimal::ONE - ratio) * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
    }

    /// Snapshot of this product as a cart line.
    ///
    /// The selling price is frozen into the line; later catalog price
    /// changes do not reach lines already in a cart.
    pub fn to_line_item(&self, quantity: u32) -> LineItem {
        LineItem::new(self.id.to_string(), self.title.clone(), self.price, quantity)
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Browse filters. The default filter matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProductFilter {
    /// Case-insensitive substring of title, description or brand.
    pub search: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
    /// Exact category; `None` means all categories.
    pub category: Option<String>,
    /// Exact brand; `None` means all brands.
    pub brand: Option<String>,
    /// Minimum star rating.
    pub min_rating: u8,
    pub in_stock_only: bool,
    pub on_sale_only: bool,
    pub free_shipping_only: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(search) = self.search.as_deref() {
            let needle = search.to_lowercase();
            let hit = product.title.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle)
                || product.brand.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| product.price < min)
            || self.max_price.is_some_and(|max| product.price > max)
        {
            return false;
        }

        if self.category.as_deref().is_some_and(|c| c != product.category)
            || self.brand.as_deref().is_some_and(|b| b != product.brand)
        {
            return false;
        }

        product.rating >= self.min_rating
            && (!self.in_stock_only || product.in_stock())
            && (!self.on_sale_only || product.on_sale)
            && (!self.free_shipping_only || product.free_shipping)
    }
}

// =============================================================================
// Sort Order
// =============================================================================

/// Product list ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    RatingAsc,
    NameAsc,
    NameDesc,
    /// Highest id first.
    Newest,
    /// Most reviews first.
    Popular,
    /// Featured products first, catalog order otherwise.
    Featured,
}

impl SortOrder {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::Default => Ordering::Equal,
            SortOrder::PriceAsc => a.price.cmp(&b.price),
            SortOrder::PriceDesc => b.price.cmp(&a.price),
            SortOrder::RatingDesc => b.rating.cmp(&a.rating),
            SortOrder::RatingAsc => a.rating.cmp(&b.rating),
            SortOrder::NameAsc => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortOrder::NameDesc => b.title.to_lowercase().cmp(&a.title.to_lowercase()),
            SortOrder::Newest => b.id.cmp(&a.id),
            SortOrder::Popular => b.reviews.cmp(&a.reviews),
            SortOrder::Featured => b.featured.cmp(&a.featured),
        }
    }
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    /// Parses a sort key from the browse dropdown. Unknown keys fall back
    /// to catalog order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "priceAsc" => SortOrder::PriceAsc,
            "priceDesc" => SortOrder::PriceDesc,
            "ratingDesc" => SortOrder::RatingDesc,
            "ratingAsc" => SortOrder::RatingAsc,
            "nameAsc" => SortOrder::NameAsc,
            "nameDesc" => SortOrder::NameDesc,
            "newest" => SortOrder::Newest,
            "popular" => SortOrder::Popular,
            "featured" => SortOrder::Featured,
            _ => SortOrder::Default,
        })
    }
}

/// Filters then sorts the catalog. Ties keep catalog order.
pub fn browse<'a>(
    products: &'a [Product],
    filter: &ProductFilter,
    sort: SortOrder,
) -> Vec<&'a Product> {
    let mut matching: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();
    matching.sort_by(|a, b| sort.compare(a, b));
    matching
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a browse result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually shown.
    pub page: usize,
    pub page_count: usize,
    /// Number of items across all pages.
    pub total: usize,
}

/// Slices `items` into 1-based pages.
///
/// The requested page is clamped into `1..=page_count`; an empty list yields
/// a single empty page. A `page_size` of 0 falls back to the default of 8.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = if page_size == 0 {
        crate::DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    let page_count = items.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, page_count);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        page,
        page_count,
        total: items.len(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

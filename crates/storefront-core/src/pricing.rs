//! # Pricing Module
//!
//! The cart pricing and promotion engine.
//!
//! ## Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Snapshot → One Breakdown                         │
//! │                                                                         │
//! │  items ──► discounted_unit_price × qty ──► subtotal                    │
//! │                                              │                          │
//! │             ┌────────────────────────────────┼──────────────────┐       │
//! │             ▼                                ▼                  ▼       │
//! │   shipping_cost(subtotal,        promo_discount(subtotal,   tax(subtotal,│
//! │     option, promo)                 promo)                     discount) │
//! │             │                                │                  │       │
//! │             └──────────────┬─────────────────┴──────────────────┘       │
//! │                            ▼                                            │
//! │        total = subtotal + shipping + tax - promo_discount              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every sub-result of a quote is derived from the same borrowed slice of
//! line items, so a cart that changes afterwards cannot make them drift.
//! Nothing is rounded here; see [`Money::rounded`].
//!
//! ## Rules
//! - Shipping is free when `subtotal >= free_shipping_threshold` or the
//!   applied promo is `FreeShipping`.
//! - `Percentage` promo: `subtotal * percent / 100`.
//! - `Fixed` promo: `min(amount, subtotal)`.
//! - Tax applies to `subtotal - promo_discount`, never to shipping.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{LineItem, PromoCode, PromoKind, ShippingCatalog, ShippingOption, TaxRate};

// =============================================================================
// Pure Functions
// =============================================================================

/// Unit price after the item's own percentage discount.
#[inline]
pub fn discounted_unit_price(item: &LineItem) -> Money {
    item.discounted_unit_price()
}

/// Sum of discounted unit price × quantity. An empty cart yields zero.
pub fn subtotal(items: &[LineItem]) -> Money {
    items.iter().map(LineItem::line_total).sum()
}

/// Monetary discount granted by the applied promo.
///
/// ## Example
/// ```rust
/// use storefront_core::money::Money;
/// use storefront_core::pricing::promo_discount;
/// use storefront_core::types::{PromoCode, PromoKind};
///
/// let welcome = PromoCode::new(
///     "WELCOME20",
///     "$20 off",
///     PromoKind::Fixed { amount: Money::from_cents(2000) },
/// );
/// // Clamped to the subtotal
/// assert_eq!(promo_discount(Money::from_cents(1500), Some(&welcome)), Money::from_cents(1500));
/// ```
pub fn promo_discount(subtotal: Money, promo: Option<&PromoCode>) -> Money {
    match promo.map(|p| &p.kind) {
        None => Money::ZERO,
        Some(PromoKind::Percentage { percent }) => subtotal.percentage(*percent),
        Some(PromoKind::Fixed { amount }) => (*amount).min(subtotal).non_negative(),
        Some(PromoKind::FreeShipping) => Money::ZERO,
    }
}

/// Tax on the promo-discounted subtotal.
#[inline]
pub fn tax(subtotal: Money, promo_discount: Money, rate: TaxRate) -> Money {
    (subtotal - promo_discount).calculate_tax(rate)
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// Configuration constants the engine prices with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    /// Sales tax applied to the discounted subtotal.
    pub tax_rate: TaxRate,

    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Money,
}

impl Default for PricingPolicy {
    /// 8% tax, free shipping from $100.00.
    fn default() -> Self {
        PricingPolicy {
            tax_rate: TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS),
            free_shipping_threshold: Money::from_cents(
                crate::DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS,
            ),
        }
    }
}

// =============================================================================
// Price Breakdown
// =============================================================================

/// The result of pricing one cart snapshot.
///
/// This is what the cart summary and the checkout/payment view display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceBreakdown {
    /// Number of distinct lines.
    pub item_count: usize,
    /// Sum of quantities across lines.
    pub total_quantity: u64,
    /// Savings from per-item discounts (already inside `subtotal`).
    pub item_savings: Money,
    pub subtotal: Money,
    /// The selected tier, even when its price was waived.
    pub shipping_option: ShippingOption,
    pub shipping: Money,
    pub free_shipping: bool,
    /// Canonical code of the applied promo, if any.
    pub promo_code: Option<String>,
    pub promo_discount: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// Stateless pricing over a shipping catalog and a policy.
///
/// The engine holds only read-only configuration, so a single instance can
/// be shared (`Arc<PricingEngine>`) and called from any number of readers.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    shipping: ShippingCatalog,
    policy: PricingPolicy,
}

impl PricingEngine {
    pub fn new(shipping: ShippingCatalog, policy: PricingPolicy) -> Self {
        PricingEngine { shipping, policy }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn shipping_catalog(&self) -> &ShippingCatalog {
        &self.shipping
    }

    /// Whether shipping is waived for this subtotal/promo pair.
    pub fn qualifies_for_free_shipping(&self, subtotal: Money, promo: Option<&PromoCode>) -> bool {
        subtotal >= self.policy.free_shipping_threshold
            || promo.is_some_and(PromoCode::waives_shipping)
    }

    /// Shipping price for the selected option.
    ///
    /// The option id is checked even when shipping ends up free; an id that
    /// is not in the catalog fails with `InvalidShippingOption`.
    pub fn shipping_cost(
        &self,
        subtotal: Money,
        option_id: &str,
        promo: Option<&PromoCode>,
    ) -> CoreResult<Money> {
        let option = self.shipping.get(option_id)?;
        if self.qualifies_for_free_shipping(subtotal, promo) {
            Ok(Money::ZERO)
        } else {
            Ok(option.price)
        }
    }

    /// Tax on `subtotal - promo_discount` at the configured rate.
    pub fn tax(&self, subtotal: Money, promo_discount: Money) -> Money {
        tax(subtotal, promo_discount, self.policy.tax_rate)
    }

    /// Prices one cart snapshot.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::pricing::PricingEngine;
    /// use storefront_core::types::LineItem;
    ///
    /// let engine = PricingEngine::default();
    /// let items = vec![LineItem::new("1", "Headphones", Money::from_cents(5000), 2)];
    ///
    /// let quote = engine.quote(&items, "standard", None).unwrap();
    /// assert_eq!(quote.subtotal, Money::from_cents(10000));
    /// assert_eq!(quote.shipping, Money::ZERO); // threshold met
    /// assert_eq!(quote.total, Money::from_cents(10800));
    /// ```
    pub fn quote(
        &self,
        items: &[LineItem],
        option_id: &str,
        promo: Option<&PromoCode>,
    ) -> CoreResult<PriceBreakdown> {
        let option = self.shipping.get(option_id)?;

        let subtotal = subtotal(items);
        let shipping = self.shipping_cost(subtotal, option_id, promo)?;
        let promo_discount = promo_discount(subtotal, promo);
        let tax = self.tax(subtotal, promo_discount);
        let total = subtotal + shipping + tax - promo_discount;

        debug!(
            items = items.len(),
            subtotal = %subtotal,
            shipping = %shipping,
            promo = promo.map(|p| p.code.as_str()).unwrap_or("-"),
            total = %total,
            "Priced cart snapshot"
        );

        Ok(PriceBreakdown {
            item_count: items.len(),
            total_quantity: items.iter().map(|i| u64::from(i.quantity)).sum(),
            item_savings: items.iter().map(LineItem::line_savings).sum(),
            subtotal,
            shipping_option: option.clone(),
            shipping,
            free_shipping: shipping.is_zero(),
            promo_code: promo.map(|p| p.code.clone()),
            promo_discount,
            tax,
            total,
        })
    }

    /// Grand total for one cart snapshot.
    pub fn total(
        &self,
        items: &[LineItem],
        option_id: &str,
        promo: Option<&PromoCode>,
    ) -> CoreResult<Money> {
        Ok(self.quote(items, option_id, promo)?.total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │ ShippingOption  │   │    PromoCode    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  code (any case)│       │
//! │  │  title          │   │  name           │   │  description    │       │
//! │  │  price (Money)  │   │  price (Money)  │   │  kind           │       │
//! │  │  discount (%)   │   │  eta_label      │   │                 │       │
//! │  │  quantity (u32) │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │     Percent     │   │   PromoKind     │       │
//! │  │  bps (u32)      │   │  0..=100        │   │  Percentage     │       │
//! │  │  800 = 8%       │   │  Decimal        │   │  Fixed          │       │
//! │  └─────────────────┘   └─────────────────┘   │  FreeShipping   │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shipping and promo catalogs are plain data handed in by the caller
//! (configuration), never literals baked into pricing code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (the storefront default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the rate as an exact fraction (800 bps → 0.08).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(10_000u32)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage in the range 0–100, used for line discounts and promos.
///
/// Not clamped on construction; [`crate::validation::validate_percent`]
/// enforces the range at the edges.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Percent(#[ts(type = "number")] Decimal);

impl Percent {
    /// 0%.
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    /// 100%.
    pub const FULL: Percent = Percent(Decimal::ONE_HUNDRED);

    /// Creates a whole-number percentage (`10` → 10%).
    #[inline]
    pub fn whole(pct: u32) -> Self {
        Percent(Decimal::from(pct))
    }

    /// Creates a percentage from an exact decimal (`12.5` → 12.5%).
    #[inline]
    pub const fn from_decimal(pct: Decimal) -> Self {
        Percent(pct)
    }

    /// Returns the percentage value (10% → 10).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the percentage as a fraction (10% → 0.1).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Checks whether the percentage is greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A product entry in the cart.
///
/// ## Zero Quantity
/// A quantity of 0 is a valid, present line. It is shown in the cart but
/// contributes nothing to totals. Lines are only removed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Product identifier; unique within a cart.
    pub id: String,

    /// Product title at the time it was added (frozen).
    pub title: String,

    /// Pre-discount unit price.
    pub price: Money,

    /// Per-item percentage discount (0–100).
    #[serde(default)]
    pub discount: Percent,

    /// Quantity in cart.
    pub quantity: u32,
}

impl LineItem {
    /// Creates an undiscounted line item.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> Self {
        LineItem {
            id: id.into(),
            title: title.into(),
            price,
            discount: Percent::ZERO,
            quantity,
        }
    }

    /// Sets the per-item discount (builder style).
    pub fn with_discount(mut self, discount: Percent) -> Self {
        self.discount = discount;
        self
    }

    /// Unit price after the per-item discount. Unrounded.
    pub fn discounted_unit_price(&self) -> Money {
        if self.discount.is_positive() {
            self.price.apply_percentage_discount(self.discount)
        } else {
            self.price
        }
    }

    /// Discounted unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.discounted_unit_price().multiply_quantity(self.quantity)
    }

    /// Amount saved on this line by the per-item discount.
    pub fn line_savings(&self) -> Money {
        self.price.multiply_quantity(self.quantity) - self.line_total()
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// A named delivery option with a flat price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingOption {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Human-readable delivery estimate ("5-7 business days").
    pub eta_label: String,
}

impl ShippingOption {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        eta_label: impl Into<String>,
    ) -> Self {
        ShippingOption {
            id: id.into(),
            name: name.into(),
            price,
            eta_label: eta_label.into(),
        }
    }
}

/// Read-only table of shipping options, looked up by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShippingCatalog(Vec<ShippingOption>);

impl ShippingCatalog {
    pub fn new(options: Vec<ShippingOption>) -> Self {
        ShippingCatalog(options)
    }

    /// Looks up an option by id.
    ///
    /// An unknown id is an integrity fault in the caller, reported as
    /// [`CoreError::InvalidShippingOption`].
    pub fn get(&self, id: &str) -> CoreResult<&ShippingOption> {
        self.0
            .iter()
            .find(|option| option.id == id)
            .ok_or_else(|| CoreError::InvalidShippingOption(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|option| option.id == id)
    }

    pub fn options(&self) -> &[ShippingOption] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ShippingCatalog {
    /// Standard, express and overnight tiers.
    fn default() -> Self {
        ShippingCatalog(vec![
            ShippingOption::new(
                "standard",
                "Standard Shipping",
                Money::from_cents(999),
                "5-7 business days",
            ),
            ShippingOption::new(
                "express",
                "Express Shipping",
                Money::from_cents(1999),
                "2-3 business days",
            ),
            ShippingOption::new(
                "overnight",
                "Overnight Shipping",
                Money::from_cents(3999),
                "Next business day",
            ),
        ])
    }
}

// =============================================================================
// Promo Codes
// =============================================================================

/// What a promo code does once applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum PromoKind {
    /// Percentage off the subtotal.
    Percentage { percent: Percent },
    /// Fixed amount off the subtotal, capped at the subtotal.
    Fixed { amount: Money },
    /// Waives shipping; no monetary discount line.
    FreeShipping,
}

/// A string token that unlocks a discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PromoCode {
    /// Canonical (upper-case) code.
    pub code: String,
    pub description: String,
    #[serde(flatten)]
    pub kind: PromoKind,
}

impl PromoCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>, kind: PromoKind) -> Self {
        PromoCode {
            code: code.into().to_uppercase(),
            description: description.into(),
            kind,
        }
    }

    /// Checks whether `input` names this code, ignoring case.
    pub fn matches(&self, input: &str) -> bool {
        self.code.to_lowercase() == input.to_lowercase()
    }

    pub fn waives_shipping(&self) -> bool {
        matches!(self.kind, PromoKind::FreeShipping)
    }
}

/// Read-only table of promo codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromoCatalog(Vec<PromoCode>);

impl PromoCatalog {
    pub fn new(codes: Vec<PromoCode>) -> Self {
        PromoCatalog(codes)
    }

    /// Resolves user input to a promo by case-insensitive exact match.
    ///
    /// ## User Workflow
    /// ```text
    /// "save10" ──► resolve() ──► Ok(SAVE10)      → "Promo code applied"
    /// "BOGUS"  ──► resolve() ──► UnknownPromoCode → "Invalid promo code"
    /// ```
    pub fn resolve(&self, input: &str) -> CoreResult<&PromoCode> {
        self.0
            .iter()
            .find(|promo| promo.matches(input))
            .ok_or_else(|| CoreError::UnknownPromoCode(input.to_string()))
    }

    pub fn codes(&self) -> &[PromoCode] {
        &self.0
    }
}

impl Default for PromoCatalog {
    fn default() -> Self {
        PromoCatalog(vec![
            PromoCode::new(
                "SAVE10",
                "10% off your order",
                PromoKind::Percentage {
                    percent: Percent::whole(10),
                },
            ),
            PromoCode::new(
                "WELCOME20",
                "$20 off your first order",
                PromoKind::Fixed {
                    amount: Money::from_cents(2000),
                },
            ),
            PromoCode::new(
                "FREESHIP",
                "Free shipping on this order",
                PromoKind::FreeShipping,
            ),
        ])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(800);
        assert_eq!(rate.bps(), 800);
        assert_eq!(rate.fraction(), dec!(0.08));
        assert!((rate.percentage() - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_default_is_eight_percent() {
        assert_eq!(TaxRate::default(), TaxRate::from_bps(800));
    }

    #[test]
    fn test_discounted_unit_price() {
        let item = LineItem::new("1", "Phone", Money::from_cents(2000), 1)
            .with_discount(Percent::whole(10));
        assert_eq!(item.discounted_unit_price(), Money::from_cents(1800));
        assert_eq!(item.line_savings(), Money::from_cents(200));
    }

    #[test]
    fn test_shipping_catalog_lookup() {
        let catalog = ShippingCatalog::default();
        assert_eq!(catalog.get("express").unwrap().price, Money::from_cents(1999));
        assert!(matches!(
            catalog.get("teleport"),
            Err(CoreError::InvalidShippingOption(id)) if id == "teleport"
        ));
    }

    #[test]
    fn test_promo_resolution_ignores_case() {
        let catalog = PromoCatalog::default();
        assert_eq!(catalog.resolve("save10").unwrap().code, "SAVE10");
        assert_eq!(catalog.resolve("Welcome20").unwrap().code, "WELCOME20");
        assert!(matches!(
            catalog.resolve("SAVE99"),
            Err(CoreError::UnknownPromoCode(_))
        ));
    }

    #[test]
    fn test_promo_code_json_shape() {
        let promo = PromoCatalog::default().resolve("SAVE10").unwrap().clone();
        let json = serde_json::to_value(&promo).unwrap();
        assert_eq!(json["code"], "SAVE10");
        assert_eq!(json["type"], "percentage");
        assert_eq!(json["percent"], 10.0);

        let back: PromoCode = serde_json::from_value(json).unwrap();
        assert_eq!(back, promo);
    }
}

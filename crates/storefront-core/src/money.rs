//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The cart promises "no rounding until final display":                   │
//! │    tax on $16.20 at 8% = $1.296 (kept exactly)                          │
//! │    display: $1.30        charge: 130 cents                              │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    exact sums/products, rounding happens in ONE place (this file)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                    // $21.98
//! let total = price + Money::from_cents(500); // $15.99
//! assert_eq!(total.cents(), 1599);
//! assert_eq!(doubled.to_string(), "$21.98");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{Percent, TaxRate};

/// Decimal places used for display and charging.
const DISPLAY_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in major currency units (dollars for USD).
///
/// ## Design Decisions
/// - **Decimal (signed)**: exact arithmetic, negative values allowed for
///   intermediate results such as discount lines
/// - **No implicit rounding**: `Add`, `Mul`, tax and discount math keep full
///   precision; [`Money::rounded`] and [`Money::cents`] are the only rounding
///   points
/// - **Equality is numeric**: `18.0 == 18.00`
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.price ──► discounted unit price ──► subtotal                  │
/// │                                                  │                      │
/// │        promo discount ◄──────────────────────────┤                      │
/// │        tax ◄─────────────────────────────────────┤                      │
/// │        shipping ◄────────────────────────────────┘                      │
/// │                                                                         │
/// │  total ──► OrderSummary.amount_due ──► charge_amount_cents()           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Zero money value.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, DISPLAY_PLACES))
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money::from_cents(major * 100 - minor)
        } else {
            Money::from_cents(major * 100 + minor)
        }
    }

    /// Wraps an exact decimal amount in major units.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the exact, unrounded amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount rounded to cents (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use storefront_core::money::Money;
    ///
    /// let tax = Money::from_decimal(Decimal::new(1296, 3)); // $1.296
    /// assert_eq!(tax.rounded(), Money::from_cents(130));
    /// ```
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns the value in whole cents, rounding half away from zero.
    ///
    /// This is the amount handed to a payment processor.
    pub fn cents(&self) -> i64 {
        (self.0 * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or_default()
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `self` floored at zero.
    #[inline]
    pub fn non_negative(&self) -> Self {
        Money(self.0.max(Decimal::ZERO))
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897); // $8.97
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Returns `percent` of this amount, unrounded.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::Percent;
    ///
    /// let subtotal = Money::from_cents(1800); // $18.00
    /// let discount = subtotal.percentage(Percent::whole(10));
    /// assert_eq!(discount, Money::from_cents(180)); // $1.80
    /// ```
    pub fn percentage(&self, percent: Percent) -> Money {
        Money(self.0 * percent.fraction())
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// `price * (1 - percent/100)`, unrounded.
    pub fn apply_percentage_discount(&self, percent: Percent) -> Money {
        Money(self.0 * (Decimal::ONE - percent.fraction()))
    }

    /// Calculates tax on this amount, unrounded.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::TaxRate;
    ///
    /// let taxable = Money::from_cents(10000); // $100.00
    /// let tax = taxable.calculate_tax(TaxRate::from_bps(800)); // 8%
    /// assert_eq!(tax, Money::from_cents(800)); // $8.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0 * rate.fraction())
    }

    /// Divides the amount into `parts` equal shares rounded to cents.
    ///
    /// The last share absorbs the rounding remainder so the shares always
    /// add back up to `self.rounded()`.
    pub fn split_evenly(&self, parts: u32) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }

        let total = self.rounded();
        let share = Money(total.0 / Decimal::from(parts)).rounded();
        let mut shares = vec![share; parts as usize];
        let allocated = share.multiply_quantity(parts - 1);
        if let Some(last) = shares.last_mut() {
            *last = total - allocated;
        }
        shares
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount rounded to cents, e.g. `$27.49`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded().0;
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        write!(f, "{}${:.2}", sign, rounded.abs())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

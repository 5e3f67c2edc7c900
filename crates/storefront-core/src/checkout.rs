//! # Checkout Module
//!
//! Turns a priced cart into what the payment view shows and charges.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout                                        │
//! │                                                                         │
//! │  PriceBreakdown ──► + surcharge(method) ──► amount_due                 │
//! │                                                 │                       │
//! │                      ┌──────────────────────────┼────────────────┐      │
//! │                      ▼                          ▼                ▼      │
//! │              InstallmentPlan            charge_amount_cents   display   │
//! │              (klarna, afterpay)         (rounded once)        "$x.xx"   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The library never talks to a payment processor; a [`ChargeRequest`] is the
//! hand-off value a processor integration consumes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::money::Money;
use crate::pricing::PriceBreakdown;
use crate::types::LineItem;

/// Number of payments in a buy-now-pay-later plan.
const INSTALLMENT_COUNT: u32 = 4;

/// Weeks between installment due dates.
const INSTALLMENT_INTERVAL_WEEKS: i64 = 2;

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit or debit card.
    Card,
    Paypal,
    Apple,
    Google,
    Crypto,
    /// Bank transfer.
    Bank,
    Klarna,
    Afterpay,
    /// Cash on delivery, carries a handling fee.
    Cod,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 9] = [
        PaymentMethod::Card,
        PaymentMethod::Paypal,
        PaymentMethod::Apple,
        PaymentMethod::Google,
        PaymentMethod::Crypto,
        PaymentMethod::Bank,
        PaymentMethod::Klarna,
        PaymentMethod::Afterpay,
        PaymentMethod::Cod,
    ];

    /// Wire id, as used by the payment form.
    pub fn id(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Apple => "apple",
            PaymentMethod::Google => "google",
            PaymentMethod::Crypto => "crypto",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Klarna => "klarna",
            PaymentMethod::Afterpay => "afterpay",
            PaymentMethod::Cod => "cod",
        }
    }

    /// Label shown on the payment form.
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::Apple => "Apple Pay",
            PaymentMethod::Google => "Google Pay",
            PaymentMethod::Crypto => "Cryptocurrency",
            PaymentMethod::Bank => "Bank Transfer",
            PaymentMethod::Klarna => "Klarna",
            PaymentMethod::Afterpay => "Afterpay",
            PaymentMethod::Cod => "Cash on Delivery",
        }
    }

    /// Fee added on top of the cart total. Only cash on delivery has one.
    pub fn surcharge(&self) -> Money {
        match self {
            PaymentMethod::Cod => Money::from_cents(crate::COD_FEE_CENTS),
            _ => Money::ZERO,
        }
    }

    /// Whether the amount due is split into installments.
    pub fn is_pay_later(&self) -> bool {
        matches!(self, PaymentMethod::Klarna | PaymentMethod::Afterpay)
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Card
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.id() == wanted)
            .ok_or_else(|| CoreError::UnknownPaymentMethod(s.to_string()))
    }
}

// =============================================================================
// Installments
// =============================================================================

/// One scheduled payment of a pay-later plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Installment {
    /// 1-based position in the plan.
    pub number: u32,
    /// Weeks after checkout ("Today", "In 2 weeks", ...).
    pub due_in_weeks: i64,
    #[ts(as = "String")]
    pub due_at: DateTime<Utc>,
    pub amount: Money,
}

/// Four payments, two weeks apart, starting at checkout.
///
/// ## Schedule
/// ```text
/// amount_due $27.49 ──► $6.87 today
///                       $6.87 in 2 weeks
///                       $6.87 in 4 weeks
///                       $6.88 in 6 weeks  (absorbs the remainder)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InstallmentPlan {
    pub installments: Vec<Installment>,
}

impl InstallmentPlan {
    /// Splits `amount` into the standard four-payment schedule.
    pub fn split(amount: Money, starting: DateTime<Utc>) -> Self {
        let installments = amount
            .split_evenly(INSTALLMENT_COUNT)
            .into_iter()
            .zip(0..)
            .map(|(share, index)| {
                let weeks = index * INSTALLMENT_INTERVAL_WEEKS;
                Installment {
                    number: index as u32 + 1,
                    due_in_weeks: weeks,
                    due_at: starting + Duration::weeks(weeks),
                    amount: share,
                }
            })
            .collect();

        InstallmentPlan { installments }
    }

    /// Sum of all installments (equals the rounded amount due).
    pub fn total(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }
}

// =============================================================================
// Order Summary
// =============================================================================

/// Everything the payment view needs to show and charge one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderSummary {
    #[ts(as = "String")]
    pub order_id: Uuid,
    /// Lines as they were priced.
    pub items: Vec<LineItem>,
    pub breakdown: PriceBreakdown,
    pub payment_method: PaymentMethod,
    /// Payment method fee, outside the taxed cart total.
    pub surcharge: Money,
    /// `breakdown.total + surcharge`, unrounded.
    pub amount_due: Money,
    pub installments: Option<InstallmentPlan>,
    #[ts(as = "String")]
    pub quoted_at: DateTime<Utc>,
}

impl OrderSummary {
    /// Builds a summary for a freshly priced cart.
    pub fn new(items: Vec<LineItem>, breakdown: PriceBreakdown, method: PaymentMethod) -> Self {
        Self::at(items, breakdown, method, Utc::now())
    }

    /// Builds a summary as of `quoted_at`.
    pub fn at(
        items: Vec<LineItem>,
        breakdown: PriceBreakdown,
        method: PaymentMethod,
        quoted_at: DateTime<Utc>,
    ) -> Self {
        let surcharge = method.surcharge();
        let amount_due = breakdown.total + surcharge;
        let installments = method
            .is_pay_later()
            .then(|| InstallmentPlan::split(amount_due, quoted_at));

        OrderSummary {
            order_id: Uuid::new_v4(),
            items,
            breakdown,
            payment_method: method,
            surcharge,
            amount_due,
            installments,
            quoted_at,
        }
    }

    /// Amount to charge in the smallest currency unit.
    ///
    /// The only point where the amount due is rounded: half away from zero.
    pub fn charge_amount_cents(&self) -> i64 {
        self.amount_due.cents()
    }

    /// The hand-off value for a payment processor integration.
    pub fn charge_request(&self, currency: &str) -> ChargeRequest {
        ChargeRequest {
            order_id: self.order_id,
            amount_cents: self.charge_amount_cents(),
            currency: currency.to_lowercase(),
            payment_method: self.payment_method,
        }
    }
}

/// Payload for creating a payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChargeRequest {
    #[ts(as = "String")]
    pub order_id: Uuid,
    pub amount_cents: i64,
    /// ISO 4217 code, lower case ("usd").
    pub currency: String,
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Unit Tests
// =============================================================================

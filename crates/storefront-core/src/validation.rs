//! # Validation Module
//!
//! Input validation utilities for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (forms)                                             │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart session (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart API (remote)                                            │
//! │  └── Authoritative stock and account checks                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{coerce_quantity, validate_promo_input};
//!
//! assert_eq!(coerce_quantity(-3), 0);
//! assert!(validate_promo_input("SAVE10").is_ok());
//! assert!(validate_promo_input("   ").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, Percent};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest promo code a user may type.
const MAX_PROMO_CODE_LEN: usize = 32;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a promo code as typed by the user.
///
/// ## Rules
/// - Must not be blank
/// - At most 32 characters
///
/// Whether the code exists is decided by the promo catalog, not here.
pub fn validate_promo_input(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "promo code".to_string(),
        });
    }

    if code.chars().count() > MAX_PROMO_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "promo code".to_string(),
            max: MAX_PROMO_CODE_LEN,
        });
    }

    Ok(())
}

/// Validates a product title.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Coerces a requested quantity into the valid range.
///
/// ## Rules
/// - Negative values become 0 (the line stays, contributing nothing)
/// - Values above MAX_ITEM_QUANTITY (999) become 999
///
/// ```text
/// User types in quantity box:   -2 ──► 0
///                                5 ──► 5
///                             5000 ──► 999
/// ```
pub fn coerce_quantity(qty: i64) -> u32 {
    qty.clamp(0, i64::from(MAX_ITEM_QUANTITY)) as u32
}

/// Validates a money amount that must not be negative (prices, fees).
///
/// ## Example
/// ```rust
/// use storefront_core::money::Money;
/// use storefront_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("price", Money::from_cents(1099)).is_ok());
/// assert!(validate_non_negative("price", Money::ZERO).is_ok());
/// assert!(validate_non_negative("price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage is within 0–100.
pub fn validate_percent(field: &str, percent: Percent) -> ValidationResult<()> {
    if percent < Percent::ZERO || percent > Percent::FULL {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a line item before it enters a cart.
///
/// ## Rules
/// - `id` must not be blank
/// - `title` follows [`validate_title`]
/// - `price` must not be negative
/// - `discount` must be within 0–100
/// - `quantity` must not exceed MAX_ITEM_QUANTITY
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    if item.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    validate_title(&item.title)?;
    validate_non_negative("price", item.price)?;
    validate_percent("discount", item.discount)?;

    if item.quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that every id in `ids` is unique.
pub fn validate_unique_ids<'a>(
    field: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> ValidationResult<()> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id.to_lowercase()) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Pricing, promo, cart rule violations           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-session errors (separate crate)                            │
//! │  └── SessionError     - Store, config and checkout failures            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → cart/checkout view │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recoverable vs. Integrity Faults
//! - `UnknownPromoCode` is user input: the view shows "Invalid promo code"
//!   and the cart is left unchanged.
//! - `InvalidShippingOption` means the caller selected an id that is not in
//!   the catalog it configured. That is a programming error.
//! - A Fixed promo larger than the subtotal is clamped, never an error.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Promo code not present in the catalog.
    ///
    /// ## User Workflow
    /// ```text
    /// Apply "SAVE99"
    ///      │
    ///      ▼
    /// PromoCatalog::resolve → UnknownPromoCode("SAVE99")
    ///      │
    ///      ▼
    /// UI shows: "Invalid promo code" (applied promo unchanged)
    /// ```
    #[error("Unknown promo code: {0}")]
    UnknownPromoCode(String),

    /// Shipping option id not present in the catalog.
    #[error("Invalid shipping option: {0}")]
    InvalidShippingOption(String),

    /// Line item is not in the cart (or saved-for-later list).
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Merged quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u64, max: u32 },

    /// Payment method id not recognised.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Whether the error stems from user input the view can simply reject.
    pub fn is_user_recoverable(&self) -> bool {
        !matches!(self, CoreError::InvalidShippingOption(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Duplicate value (e.g., duplicate shipping id in a catalog).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownPromoCode("SAVE99".to_string());
        assert_eq!(err.to_string(), "Unknown promo code: SAVE99");

        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(err.to_string(), "Quantity 1200 exceeds maximum allowed (999)");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "promo code".to_string(),
        };
        assert_eq!(err.to_string(), "promo code is required");

        let err = ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "discount must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Negative {
            field: "price".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_recoverability() {
        assert!(CoreError::UnknownPromoCode("X".into()).is_user_recoverable());
        assert!(!CoreError::InvalidShippingOption("x".into()).is_user_recoverable());
    }
}

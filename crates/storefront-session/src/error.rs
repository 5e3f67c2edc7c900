//! # Session Error Types
//!
//! Error types for cart sessions, stores and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Store       │  │      Domain             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Store          │  │  Core (promo, shipping, │ │
//! │  │  ConfigLoad     │  │  Serialization  │  │   cart rules)           │ │
//! │  │  Io             │  │                 │  │  EmptyCart              │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::CoreError;
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session error type covering everything outside pure pricing.
#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// A cart, promo, shipping or payment rule was violated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Checkout was attempted with no lines in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// The cart store failed to load or persist a record.
    #[error("Cart store error: {0}")]
    Store(String),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid storefront configuration.
    #[error("Invalid storefront configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse config file.
    #[error("Failed to load config: {0}")]
    ConfigLoad(#[from] toml::de::Error),

    /// Failed to write config file.
    #[error("Failed to save config: {0}")]
    ConfigSave(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Whether the error should be shown to the shopper as a simple notice
    /// ("Invalid promo code") with the cart left untouched.
    pub fn is_user_recoverable(&self) -> bool {
        match self {
            SessionError::Core(err) => err.is_user_recoverable(),
            SessionError::EmptyCart => true,
            _ => false,
        }
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSave(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_pass_through() {
        let err: SessionError = CoreError::UnknownPromoCode("SAVE99".into()).into();
        assert_eq!(err.to_string(), "Unknown promo code: SAVE99");
        assert!(err.is_user_recoverable());
    }

    #[test]
    fn test_integrity_faults_are_not_recoverable() {
        let err: SessionError = CoreError::InvalidShippingOption("drone".into()).into();
        assert!(!err.is_user_recoverable());
        assert!(!SessionError::Store("poisoned".into()).is_user_recoverable());
    }
}

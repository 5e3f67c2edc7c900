//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate is the **heart** of the storefront. It contains the cart, the
//! pricing and promotion engine, product browsing and checkout summaries as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (views)                             │   │
//! │  │    Browse ──► Cart ──► Checkout/Payment ──► Confirmation        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               storefront-session                                │   │
//! │  │    CartSession, CartStore, StorefrontConfig, quote binary       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │ pricing │ │checkout │  │   │
//! │  │   │LineItem │ │  Money  │ │  Cart   │ │ Engine  │ │ Summary │  │   │
//! │  │   │ Promo   │ │ Percent │ │         │ │Breakdown│ │ Method  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, ShippingOption, PromoCode, etc.)
//! - [`money`] - Exact decimal money, rounded only for display and charging
//! - [`pricing`] - Subtotal, shipping, promo discount, tax and total
//! - [`cart`] - Cart lines and their mutation rules
//! - [`catalog`] - Product filtering, sorting and pagination
//! - [`checkout`] - Payment methods and order summaries
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same cart snapshot, same breakdown
//! 2. **No I/O**: storage and configuration files belong to storefront-session
//! 3. **Exact Money**: decimal arithmetic, no float drift, no early rounding
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::cart::Cart;
//! use storefront_core::money::Money;
//! use storefront_core::pricing::PricingEngine;
//! use storefront_core::types::{LineItem, PromoCatalog};
//!
//! let mut cart = Cart::new();
//! cart.add_item(LineItem::new("1", "Wireless Headphones", Money::from_cents(5000), 2))
//!     .unwrap();
//!
//! let engine = PricingEngine::default();
//! let promos = PromoCatalog::default();
//! let promo = promos.resolve("freeship").unwrap();
//!
//! let quote = engine.quote(cart.items(), "express", Some(promo)).unwrap();
//! assert_eq!(quote.shipping, Money::ZERO);
//! assert_eq!(quote.total, Money::from_cents(10800));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storefront_core::Money` instead of
// `use storefront_core::money::Money`

pub use cart::Cart;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{PriceBreakdown, PricingEngine, PricingPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default sales tax in basis points (8%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

/// Default subtotal at or above which shipping is free ($100.00).
pub const DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS: i64 = 10_000;

/// Maximum distinct lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps stored snapshots small.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Flat handling fee for cash on delivery ($3.00).
pub const COD_FEE_CENTS: i64 = 300;

/// Products shown per page when browsing.
pub const DEFAULT_PAGE_SIZE: usize = 8;

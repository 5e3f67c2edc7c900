//! # storefront-session: Cart Sessions for the Storefront
//!
//! Wraps the pure pricing engine in an owned, persisted cart session.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       storefront-session                                │
//! │                                                                         │
//! │   StorefrontConfig ──► PricingEngine + PromoCatalog                    │
//! │          │                        │                                     │
//! │          ▼                        ▼                                     │
//! │   CartSession ◄──── Arc<dyn CartStore> (in-memory, or remote)          │
//! │          │                                                              │
//! │          ├──► quote()     → PriceBreakdown                              │
//! │          └──► checkout()  → OrderSummary                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use storefront_core::{LineItem, Money};
//! use storefront_session::{CartSession, CartStore, InMemoryCartStore, StorefrontConfig};
//!
//! let store: Arc<dyn CartStore> = Arc::new(InMemoryCartStore::new());
//! let config = Arc::new(StorefrontConfig::default());
//! let mut session = CartSession::open("guest", config, store).unwrap();
//!
//! session
//!     .add_item(LineItem::new("1", "Wireless Headphones", Money::from_cents(5000), 2))
//!     .unwrap();
//! assert_eq!(session.quote().unwrap().total, Money::from_cents(10800));
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod telemetry;

pub use config::StorefrontConfig;
pub use error::{SessionError, SessionResult};
pub use session::CartSession;
pub use store::{CartRecord, CartStore, InMemoryCartStore};

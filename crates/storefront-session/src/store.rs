//! # Cart Store
//!
//! Persistence seam for cart sessions.
//!
//! ```text
//! ┌──────────────┐   save(record)    ┌──────────────────────────────┐
//! │ CartSession  │ ────────────────► │ dyn CartStore                │
//! │              │ ◄──────────────── │  • InMemoryCartStore (here)  │
//! └──────────────┘   load(cart_id)   │  • remote cart API (caller)  │
//!                                    └──────────────────────────────┘
//! ```
//!
//! A store only moves whole [`CartRecord`]s; it never interprets them.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::{Cart, LineItem};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// Cart Record
// =============================================================================

/// Everything a session persists between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRecord {
    pub cart_id: String,
    pub cart: Cart,
    #[serde(default)]
    pub saved_for_later: Vec<LineItem>,
    /// Canonical code of the applied promo (single slot).
    #[serde(default)]
    pub promo_code: Option<String>,
    pub shipping_option: String,
    pub updated_at: DateTime<Utc>,
}

impl CartRecord {
    /// A fresh, empty record.
    pub fn new(cart_id: impl Into<String>, shipping_option: impl Into<String>) -> Self {
        CartRecord {
            cart_id: cart_id.into(),
            cart: Cart::new(),
            saved_for_later: Vec::new(),
            promo_code: None,
            shipping_option: shipping_option.into(),
            updated_at: Utc::now(),
        }
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Trait for cart persistence (implemented by the in-memory store, or by a
/// remote cart API client).
pub trait CartStore: Send + Sync {
    /// Loads a record, or `None` if the cart id is unknown.
    fn load(&self, cart_id: &str) -> SessionResult<Option<CartRecord>>;

    /// Inserts or replaces a record.
    fn save(&self, record: &CartRecord) -> SessionResult<()>;

    /// Deletes a record, returning whether it existed.
    fn delete(&self, cart_id: &str) -> SessionResult<bool>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Process-local store backed by a `Mutex<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    records: Mutex<HashMap<String, CartRecord>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored carts.
    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> SessionError {
    SessionError::Store("cart store lock poisoned".into())
}

impl CartStore for InMemoryCartStore {
    fn load(&self, cart_id: &str) -> SessionResult<Option<CartRecord>> {
        let records = self.records.lock().map_err(poisoned)?;
        Ok(records.get(cart_id).cloned())
    }

    fn save(&self, record: &CartRecord) -> SessionResult<()> {
        let mut records = self.records.lock().map_err(poisoned)?;
        records.insert(record.cart_id.clone(), record.clone());
        Ok(())
    }

    fn delete(&self, cart_id: &str) -> SessionResult<bool> {
        let mut records = self.records.lock().map_err(poisoned)?;
        Ok(records.remove(cart_id).is_some())
    }
}

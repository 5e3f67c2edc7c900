//! # Cart Session
//!
//! One shopper's cart, its promo slot, shipping choice and saved-for-later
//! list, persisted through an injected [`CartStore`].
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Session Operations                              │
//! │                                                                         │
//! │  View Action              Session Method          Persisted Change      │
//! │  ───────────              ──────────────          ────────────────      │
//! │                                                                         │
//! │  Add to Cart ────────────► add_item() ──────────► cart line merged     │
//! │  Quantity box ───────────► set_quantity() ──────► qty coerced          │
//! │  Remove ─────────────────► remove_item() ───────► line dropped         │
//! │  Save for later ─────────► save_for_later() ────► cart → saved list    │
//! │  Move to cart ───────────► move_to_cart() ──────► saved → cart (qty 1) │
//! │  Apply promo ────────────► apply_promo() ───────► promo slot replaced  │
//! │  Remove promo ───────────► remove_promo() ──────► promo slot cleared   │
//! │  Shipping radio ─────────► select_shipping() ───► shipping id          │
//! │                                                                         │
//! │  Summary panel ──────────► quote() ─────────────► (read only)          │
//! │  Pay button ─────────────► checkout() ──────────► (read only)          │
//! │  Payment succeeded ──────► complete_checkout() ─► cart + promo cleared │
//! │                                                                         │
//! │  NOTE: Mutations work on a copy of the record. The copy replaces the   │
//! │        session state only after the store accepted it, so a failed     │
//! │        operation leaves both the session and the store untouched.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use storefront_core::catalog::Product;
use storefront_core::checkout::{OrderSummary, PaymentMethod};
use storefront_core::validation::{validate_line_item, validate_promo_input};
use storefront_core::{
    Cart, CoreError, LineItem, PriceBreakdown, PricingEngine, PromoCode, ShippingOption,
};
use tracing::{debug, info, warn};

use crate::config::StorefrontConfig;
use crate::error::{SessionError, SessionResult};
use crate::store::{CartRecord, CartStore};

/// An explicitly owned cart session.
///
/// Cart state is owned by exactly one session. Configuration and the store
/// are shared handles.
pub struct CartSession {
    record: CartRecord,
    config: Arc<StorefrontConfig>,
    engine: PricingEngine,
    store: Arc<dyn CartStore>,
}

impl std::fmt::Debug for CartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSession")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl CartSession {
    /// Opens the session for `cart_id`, resuming a stored cart if one exists.
    ///
    /// Stored cart lines are checked while the record is decoded. Saved
    /// lines are checked here, and a malformed one fails the open.
    pub fn open(
        cart_id: impl Into<String>,
        config: Arc<StorefrontConfig>,
        store: Arc<dyn CartStore>,
    ) -> SessionResult<Self> {
        let cart_id = cart_id.into();
        let record = match store.load(&cart_id)? {
            Some(record) => {
                for saved in &record.saved_for_later {
                    validate_line_item(saved).map_err(CoreError::from)?;
                }
                debug!(cart_id = %cart_id, lines = record.cart.item_count(), "Resumed cart");
                record
            }
            None => {
                info!(cart_id = %cart_id, "Starting new cart");
                CartRecord::new(cart_id, config.default_shipping())
            }
        };

        let engine = config.pricing_engine();
        let mut session = CartSession {
            record,
            config,
            engine,
            store,
        };

        if !session.engine.shipping_catalog().contains(&session.record.shipping_option) {
            warn!(
                shipping = %session.record.shipping_option,
                "Stored shipping option no longer offered, using default"
            );
            session.record.shipping_option = session.config.default_shipping().to_string();
        }

        Ok(session)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn cart_id(&self) -> &str {
        &self.record.cart_id
    }

    pub fn cart(&self) -> &Cart {
        &self.record.cart
    }

    pub fn items(&self) -> &[LineItem] {
        self.record.cart.items()
    }

    pub fn saved_for_later(&self) -> &[LineItem] {
        &self.record.saved_for_later
    }

    /// The promo in the single slot, if any.
    ///
    /// A stored code that the promo catalog no longer lists counts as no
    /// promo.
    pub fn applied_promo(&self) -> Option<&PromoCode> {
        let code = self.record.promo_code.as_deref()?;
        self.config.promos.resolve(code).ok()
    }

    pub fn shipping_option(&self) -> SessionResult<&ShippingOption> {
        Ok(self
            .engine
            .shipping_catalog()
            .get(&self.record.shipping_option)?)
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    // =========================================================================
    // Cart Lines
    // =========================================================================

    /// Adds a line, merging quantities with an existing line of the same id.
    pub fn add_item(&mut self, item: LineItem) -> SessionResult<()> {
        let (id, quantity) = (item.id.clone(), item.quantity);
        let mut record = self.record.clone();
        record.cart.add_item(item)?;
        self.commit(record)?;
        debug!(cart_id = %self.cart_id(), item = %id, quantity, "Added to cart");
        Ok(())
    }

    /// Adds `quantity` of a catalog product.
    pub fn add_product(&mut self, product: &Product, quantity: u32) -> SessionResult<()> {
        self.add_item(product.to_line_item(quantity))
    }

    /// Sets a line's quantity, returning the coerced value that was stored.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> SessionResult<u32> {
        let mut record = self.record.clone();
        let stored = record.cart.set_quantity(id, quantity)?;
        self.commit(record)?;
        if i64::from(stored) != quantity {
            debug!(item = %id, requested = quantity, stored, "Quantity coerced");
        }
        Ok(stored)
    }

    /// Removes a line. Removing an absent id is a no-op and writes nothing.
    pub fn remove_item(&mut self, id: &str) -> SessionResult<Option<LineItem>> {
        let mut record = self.record.clone();
        let Some(removed) = record.cart.remove_item(id) else {
            return Ok(None);
        };
        self.commit(record)?;
        debug!(cart_id = %self.cart_id(), item = %id, "Removed from cart");
        Ok(Some(removed))
    }

    /// Empties the cart. The promo slot and shipping choice are kept.
    pub fn clear(&mut self) -> SessionResult<()> {
        let mut record = self.record.clone();
        record.cart.clear();
        self.commit(record)?;
        info!(cart_id = %self.cart_id(), "Cart cleared");
        Ok(())
    }

    // =========================================================================
    // Saved for Later
    // =========================================================================

    /// Moves a line out of the cart into the saved list.
    ///
    /// An existing saved entry with the same id is replaced.
    pub fn save_for_later(&mut self, id: &str) -> SessionResult<()> {
        let mut record = self.record.clone();
        let item = record
            .cart
            .remove_item(id)
            .ok_or_else(|| CoreError::ItemNotInCart(id.to_string()))?;

        record.saved_for_later.retain(|saved| saved.id != id);
        record.saved_for_later.push(item);
        self.commit(record)?;
        debug!(cart_id = %self.cart_id(), item = %id, "Saved for later");
        Ok(())
    }

    /// Moves a saved line back into the cart with quantity 1.
    pub fn move_to_cart(&mut self, id: &str) -> SessionResult<()> {
        let mut record = self.record.clone();
        let index = record
            .saved_for_later
            .iter()
            .position(|saved| saved.id == id)
            .ok_or_else(|| CoreError::ItemNotInCart(id.to_string()))?;

        let mut item = record.saved_for_later.remove(index);
        item.quantity = 1;
        record.cart.add_item(item)?;
        self.commit(record)?;

        debug!(cart_id = %self.cart_id(), item = %id, "Moved to cart");
        Ok(())
    }

    /// Drops a line from the saved list.
    pub fn remove_saved(&mut self, id: &str) -> SessionResult<Option<LineItem>> {
        let Some(index) = self.record.saved_for_later.iter().position(|s| s.id == id) else {
            return Ok(None);
        };
        let mut record = self.record.clone();
        let removed = record.saved_for_later.remove(index);
        self.commit(record)?;
        Ok(Some(removed))
    }

    // =========================================================================
    // Promo Slot
    // =========================================================================

    /// Applies a promo code, replacing any promo already applied.
    ///
    /// ## User Workflow
    /// ```text
    /// "welcome20" ──► Ok(WELCOME20)          slot = WELCOME20
    /// "BOGUS"     ──► Err(UnknownPromoCode)  slot unchanged
    /// ```
    pub fn apply_promo(&mut self, input: &str) -> SessionResult<&PromoCode> {
        validate_promo_input(input).map_err(CoreError::from)?;

        let promo = match self.config.promos.resolve(input) {
            Ok(promo) => promo,
            Err(err) => {
                debug!(cart_id = %self.record.cart_id, code = %input, "Rejected promo code");
                return Err(err.into());
            }
        };

        let code = promo.code.clone();
        let mut record = self.record.clone();
        let replaced = record.promo_code.replace(code.clone());
        self.commit(record)?;
        info!(
            cart_id = %self.record.cart_id,
            code = %code,
            replaced = replaced.as_deref().unwrap_or("-"),
            "Promo code applied"
        );

        self.applied_promo()
            .ok_or_else(|| CoreError::UnknownPromoCode(input.to_string()).into())
    }

    /// Clears the promo slot, returning the code that was applied.
    pub fn remove_promo(&mut self) -> SessionResult<Option<String>> {
        let mut record = self.record.clone();
        let Some(code) = record.promo_code.take() else {
            return Ok(None);
        };
        self.commit(record)?;
        info!(cart_id = %self.cart_id(), code = %code, "Promo code removed");
        Ok(Some(code))
    }

    // =========================================================================
    // Shipping
    // =========================================================================

    /// Selects a shipping tier from the configured catalog.
    pub fn select_shipping(&mut self, option_id: &str) -> SessionResult<()> {
        self.engine.shipping_catalog().get(option_id)?;
        let mut record = self.record.clone();
        record.shipping_option = option_id.to_string();
        self.commit(record)?;
        debug!(cart_id = %self.cart_id(), shipping = %option_id, "Shipping selected");
        Ok(())
    }

    // =========================================================================
    // Pricing & Checkout
    // =========================================================================

    /// Prices the current cart.
    pub fn quote(&self) -> SessionResult<PriceBreakdown> {
        Ok(self.engine.quote(
            self.record.cart.items(),
            &self.record.shipping_option,
            self.applied_promo(),
        )?)
    }

    /// Builds the order summary for the payment view.
    ///
    /// A cart with no lines, or only zero-quantity lines, is rejected.
    pub fn checkout(&self, method: PaymentMethod) -> SessionResult<OrderSummary> {
        if self.record.cart.total_quantity() == 0 {
            return Err(SessionError::EmptyCart);
        }

        let breakdown = self.quote()?;
        let summary = OrderSummary::new(self.items().to_vec(), breakdown, method);
        info!(
            cart_id = %self.cart_id(),
            order_id = %summary.order_id,
            method = %method,
            amount_cents = summary.charge_amount_cents(),
            "Checkout summary created"
        );
        Ok(summary)
    }

    /// Finalises a paid order: empties the cart and clears the promo slot.
    pub fn complete_checkout(&mut self, summary: &OrderSummary) -> SessionResult<()> {
        let mut record = self.record.clone();
        record.cart.clear();
        record.promo_code = None;
        self.commit(record)?;
        info!(cart_id = %self.cart_id(), order_id = %summary.order_id, "Order completed");
        Ok(())
    }

    /// Deletes the stored record and starts over with an empty cart.
    pub fn discard(&mut self) -> SessionResult<()> {
        self.store.delete(&self.record.cart_id)?;
        self.record = CartRecord::new(self.record.cart_id.clone(), self.config.default_shipping());
        Ok(())
    }

    /// Saves `record` and, once the store accepted it, makes it current.
    fn commit(&mut self, mut record: CartRecord) -> SessionResult<()> {
        record.updated_at = Utc::now();
        self.store.save(&record)?;
        self.record = record;
        Ok(())
    }
}

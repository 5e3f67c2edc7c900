//! # Cart Module
//!
//! The shopping cart: an ordered list of line items and the rules for
//! changing it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Frontend Action          Operation               Cart Change           │
//! │  ───────────────          ─────────               ───────────           │
//! │                                                                         │
//! │  Add to Cart ────────────► add_item() ──────────► push, or merge qty   │
//! │                                                                         │
//! │  Change Quantity ────────► set_quantity() ──────► items[i].qty = n     │
//! │                             (n coerced to 0..=999, 0 keeps the line)    │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ───────► retain (no-op if     │
//! │                                                   absent)               │
//! │                                                                         │
//! │  Clear Cart ─────────────► clear() ─────────────► items.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing never reads a `Cart` directly; it borrows [`Cart::items`] as one
//! snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::LineItem;
use crate::validation::{coerce_quantity, validate_line_item};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same id increases quantity)
/// - Quantity 0 is allowed; such a line stays until removed
/// - Maximum lines: 100
/// - Maximum quantity per line: 999
///
/// Deserialization goes through [`Cart::from_items`], so a stored cart is
/// held to the same rules as one built through `add_item`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredCart")]
pub struct Cart {
    items: Vec<LineItem>,

    /// When the cart was created or last cleared.
    pub created_at: DateTime<Utc>,
}

/// Wire shape of a cart, before its lines are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCart {
    items: Vec<LineItem>,
    created_at: DateTime<Utc>,
}

impl TryFrom<StoredCart> for Cart {
    type Error = CoreError;

    fn try_from(stored: StoredCart) -> CoreResult<Self> {
        let mut cart = Cart::from_items(stored.items)?;
        cart.created_at = stored.created_at;
        Ok(cart)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Rebuilds a cart from stored lines, merging duplicate ids.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> CoreResult<Self> {
        let mut cart = Cart::new();
        for item in items {
            cart.add_item(item)?;
        }
        Ok(cart)
    }

    /// Adds a line or increases the quantity of the line with the same id.
    ///
    /// ## Behavior
    /// - Id already in cart: quantities are summed, the stored title, price
    ///   and discount are kept
    /// - Id not in cart: the line is appended
    ///
    /// ## Errors
    /// - `Validation` if the line itself is malformed
    /// - `QuantityTooLarge` if the merged quantity would exceed 999
    /// - `CartTooLarge` if a new line would exceed 100 lines
    pub fn add_item(&mut self, item: LineItem) -> CoreResult<()> {
        validate_line_item(&item)?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            let merged = u64::from(existing.quantity) + u64::from(item.quantity);
            if merged > u64::from(MAX_ITEM_QUANTITY) {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = merged as u32;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(item);
        Ok(())
    }

    /// Sets the quantity of a line, returning the quantity actually stored.
    ///
    /// The request is coerced rather than rejected: negatives become 0 and
    /// anything above 999 becomes 999. A 0 keeps the line in the cart.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> CoreResult<u32> {
        let quantity = coerce_quantity(quantity);
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::ItemNotInCart(id.to_string()))?;
        item.quantity = quantity;
        Ok(quantity)
    }

    /// Removes a line by id, returning it if it was present.
    ///
    /// Removing an absent id leaves the cart unchanged.
    pub fn remove_item(&mut self, id: &str) -> Option<LineItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// The lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of distinct lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all lines (the cart badge number).
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::pricing::subtotal;

    fn headphones(quantity: u32) -> LineItem {
        LineItem::new("1", "Wireless Headphones", Money::from_cents(5000), quantity)
    }

    #[test]
    fn test_add_merges_quantities() {
        let mut cart = Cart::new();
        cart.add_item(headphones(2)).unwrap();
        cart.add_item(headphones(3)).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.get("1").unwrap().quantity, 5);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_keeps_first_snapshot_on_merge() {
        let mut cart = Cart::new();
        cart.add_item(headphones(1)).unwrap();
        cart.add_item(LineItem::new("1", "Renamed", Money::from_cents(1), 1))
            .unwrap();

        let line = cart.get("1").unwrap();
        assert_eq!(line.title, "Wireless Headphones");
        assert_eq!(line.price, Money::from_cents(5000));
    }

    #[test]
    fn test_add_rejects_merged_overflow() {
        let mut cart = Cart::new();
        cart.add_item(headphones(900)).unwrap();
        let err = cart.add_item(headphones(100)).unwrap_err();

        assert!(matches!(
            err,
            CoreError::QuantityTooLarge {
                requested: 1000,
                max: 999
            }
        ));
        assert_eq!(cart.get("1").unwrap().quantity, 900);
    }

    #[test]
    fn test_add_rejects_too_many_lines() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add_item(LineItem::new(i.to_string(), "Cable", Money::from_cents(999), 1))
                .unwrap();
        }

        let err = cart
            .add_item(LineItem::new("overflow", "Cable", Money::from_cents(999), 1))
            .unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { max: 100 }));

        // Merging into an existing line still works at capacity
        cart.add_item(LineItem::new("0", "Cable", Money::from_cents(999), 1))
            .unwrap();
        assert_eq!(cart.get("0").unwrap().quantity, 2);
    }

    #[test]
    fn test_set_quantity_coerces() {
        let mut cart = Cart::new();
        cart.add_item(headphones(1)).unwrap();

        assert_eq!(cart.set_quantity("1", 4).unwrap(), 4);
        assert_eq!(cart.set_quantity("1", -3).unwrap(), 0);
        assert_eq!(cart.set_quantity("1", 5000).unwrap(), 999);
    }

    #[test]
    fn test_zero_quantity_keeps_line() {
        let mut cart = Cart::new();
        cart.add_item(headphones(2)).unwrap();
        cart.set_quantity("1", 0).unwrap();

        assert!(cart.contains("1"));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(subtotal(cart.items()), Money::ZERO);
    }

    #[test]
    fn test_set_quantity_unknown_id() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.set_quantity("missing", 1),
            Err(CoreError::ItemNotInCart(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(headphones(1)).unwrap();
        let before = cart.clone();

        assert!(cart.remove_item("missing").is_none());
        assert_eq!(cart, before);

        assert!(cart.remove_item("1").is_some());
        assert!(cart.remove_item("1").is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(headphones(1)).unwrap();
        cart.add_item(LineItem::new("2", "Charger", Money::from_cents(2499), 1))
            .unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_from_items_merges_duplicates() {
        let cart = Cart::from_items(vec![headphones(1), headphones(2)]).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.get("1").unwrap().quantity, 3);
    }

    #[test]
    fn test_serde_roundtrip_preserves_order() {
        let mut cart = Cart::new();
        cart.add_item(LineItem::new("b", "Mouse", Money::from_cents(2999), 1))
            .unwrap();
        cart.add_item(headphones(1)).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back.items()[0].id, "b");
        assert_eq!(back.items()[1].id, "1");
        assert_eq!(back.created_at, cart.created_at);
    }

    #[test]
    fn test_deserialize_merges_duplicate_ids() {
        let json = r#"{
            "items": [
                { "id": "1", "title": "Headphones", "price": 50.0, "quantity": 1 },
                { "id": "1", "title": "Headphones", "price": 50.0, "quantity": 2 }
            ],
            "createdAt": "2026-01-01T00:00:00Z"
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.get("1").unwrap().quantity, 3);
    }

    #[test]
    fn test_deserialize_rejects_invalid_lines() {
        let line = |fields: &str| {
            format!(
                r#"{{ "items": [{{ "id": "1", "title": "Cable", {} }}],
                     "createdAt": "2026-01-01T00:00:00Z" }}"#,
                fields
            )
        };

        for fields in [
            r#""price": 10.0, "discount": 250, "quantity": 1"#,
            r#""price": -3.0, "quantity": 1"#,
            r#""price": 10.0, "quantity": 5000"#,
        ] {
            assert!(
                serde_json::from_str::<Cart>(&line(fields)).is_err(),
                "accepted {}",
                fields
            );
        }
    }

    #[test]
    fn test_add_rejects_discount_over_100() {
        let mut cart = Cart::new();
        let item = headphones(1).with_discount(crate::types::Percent::whole(150));

        assert!(matches!(cart.add_item(item), Err(CoreError::Validation(_))));
        assert!(cart.is_empty());
    }
}

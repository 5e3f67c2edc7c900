//! End-to-end cart session flows over the in-memory store.

use std::sync::Arc;

use rust_decimal_macros::dec;
use storefront_core::checkout::PaymentMethod;
use storefront_core::{CoreError, LineItem, Money, Percent};
use storefront_session::{
    CartSession, CartStore, InMemoryCartStore, SessionError, StorefrontConfig,
};

fn session_with(config: StorefrontConfig) -> (CartSession, Arc<InMemoryCartStore>) {
    let store = Arc::new(InMemoryCartStore::new());
    let handle: Arc<dyn CartStore> = store.clone();
    let session = CartSession::open("shopper", Arc::new(config), handle).unwrap();
    (session, store)
}

fn session() -> (CartSession, Arc<InMemoryCartStore>) {
    session_with(StorefrontConfig::default())
}

fn line(id: &str, cents: i64, quantity: u32) -> LineItem {
    LineItem::new(id, format!("Gadget {}", id), Money::from_cents(cents), quantity)
}

#[test]
fn threshold_met_ships_free() {
    let (mut session, _) = session();
    session.add_item(line("1", 5000, 2)).unwrap();

    let quote = session.quote().unwrap();
    assert_eq!(quote.subtotal, Money::from_cents(10000));
    assert_eq!(quote.shipping, Money::ZERO);
    assert_eq!(quote.tax, Money::from_cents(800));
    assert_eq!(quote.total, Money::from_cents(10800));
}

#[test]
fn percentage_promo_on_discounted_line() {
    let (mut session, _) = session();
    session
        .add_item(line("1", 2000, 1).with_discount(Percent::whole(10)))
        .unwrap();
    session.apply_promo("SAVE10").unwrap();

    let quote = session.quote().unwrap();
    assert_eq!(quote.subtotal, Money::from_cents(1800));
    assert_eq!(quote.shipping, Money::from_cents(999));
    assert_eq!(quote.promo_discount, Money::from_cents(180));
    assert_eq!(quote.tax.amount(), dec!(1.296));
    assert_eq!(quote.total.amount(), dec!(27.486));
}

#[test]
fn fixed_promo_and_replacement() {
    let (mut session, _) = session();
    session.add_item(line("1", 3000, 1)).unwrap();

    session.apply_promo("welcome20").unwrap();
    let quote = session.quote().unwrap();
    assert_eq!(quote.promo_discount, Money::from_cents(2000));
    assert_eq!(quote.tax, Money::from_cents(80));
    assert_eq!(quote.total, Money::from_cents(3000 + 999 + 80 - 2000));

    // Single slot: FREESHIP replaces WELCOME20
    session.apply_promo("FreeShip").unwrap();
    let quote = session.quote().unwrap();
    assert_eq!(quote.promo_code.as_deref(), Some("FREESHIP"));
    assert_eq!(quote.promo_discount, Money::ZERO);
    assert_eq!(quote.shipping, Money::ZERO);

    assert_eq!(session.remove_promo().unwrap().as_deref(), Some("FREESHIP"));
    assert_eq!(session.remove_promo().unwrap(), None);
    assert_eq!(session.quote().unwrap().shipping, Money::from_cents(999));
}

#[test]
fn unknown_promo_is_recoverable_and_changes_nothing() {
    let (mut session, _) = session();
    session.add_item(line("1", 3000, 1)).unwrap();
    let before = session.quote().unwrap();

    let err = session.apply_promo("BOGUS").unwrap_err();
    assert!(matches!(err, SessionError::Core(CoreError::UnknownPromoCode(_))));
    assert!(err.is_user_recoverable());
    assert_eq!(session.quote().unwrap(), before);
}

#[test]
fn shipping_selection_changes_price() {
    let (mut session, _) = session();
    session.add_item(line("1", 3000, 1)).unwrap();

    session.select_shipping("overnight").unwrap();
    let quote = session.quote().unwrap();
    assert_eq!(quote.shipping, Money::from_cents(3999));
    assert_eq!(quote.shipping_option.eta_label, "Next business day");

    assert!(matches!(
        session.select_shipping("teleport"),
        Err(SessionError::Core(CoreError::InvalidShippingOption(_)))
    ));
    assert_eq!(session.quote().unwrap().shipping, Money::from_cents(3999));
}

#[test]
fn quantity_edits_follow_cart_rules() {
    let (mut session, _) = session();
    session.add_item(line("1", 1000, 1)).unwrap();
    session.add_item(line("1", 1000, 2)).unwrap();
    assert_eq!(session.cart().get("1").unwrap().quantity, 3);

    assert_eq!(session.set_quantity("1", -4).unwrap(), 0);
    assert_eq!(session.items().len(), 1);
    assert_eq!(session.quote().unwrap().subtotal, Money::ZERO);

    assert_eq!(session.set_quantity("1", 12_000).unwrap(), 999);

    session.remove_item("1").unwrap();
    session.remove_item("1").unwrap();
    assert!(session.items().is_empty());
}

#[test]
fn save_for_later_round_trip() {
    let (mut session, store) = session();
    session.add_item(line("1", 1000, 3)).unwrap();
    session.add_item(line("2", 2500, 1)).unwrap();

    session.save_for_later("1").unwrap();
    assert!(session.cart().get("1").is_none());
    assert_eq!(session.saved_for_later().len(), 1);

    assert!(matches!(
        session.save_for_later("1"),
        Err(SessionError::Core(CoreError::ItemNotInCart(_)))
    ));

    session.move_to_cart("1").unwrap();
    assert_eq!(session.cart().get("1").unwrap().quantity, 1);
    assert!(session.saved_for_later().is_empty());

    let stored = store.load("shopper").unwrap().unwrap();
    assert_eq!(stored.cart.item_count(), 2);
    assert!(stored.saved_for_later.is_empty());
}

#[test]
fn move_to_cart_merges_with_existing_line() {
    let (mut session, _) = session();
    session.add_item(line("1", 1000, 2)).unwrap();
    session.save_for_later("1").unwrap();
    session.add_item(line("1", 1000, 4)).unwrap();

    session.move_to_cart("1").unwrap();
    assert_eq!(session.cart().get("1").unwrap().quantity, 5);
}

#[test]
fn clear_keeps_promo_slot() {
    let (mut session, _) = session();
    session.add_item(line("1", 1000, 1)).unwrap();
    session.apply_promo("SAVE10").unwrap();
    session.clear().unwrap();

    assert!(session.items().is_empty());
    assert_eq!(session.applied_promo().unwrap().code, "SAVE10");
    assert_eq!(session.quote().unwrap().total, Money::from_cents(999));
}

#[test]
fn checkout_with_cash_on_delivery() {
    let (mut session, _) = session();
    session
        .add_item(line("1", 2000, 1).with_discount(Percent::whole(10)))
        .unwrap();
    session.apply_promo("SAVE10").unwrap();

    let summary = session.checkout(PaymentMethod::Cod).unwrap();
    assert_eq!(summary.surcharge, Money::from_cents(300));
    assert_eq!(summary.charge_amount_cents(), 3049);
    assert_eq!(summary.items.len(), 1);

    let summary = session.checkout(PaymentMethod::Afterpay).unwrap();
    let plan = summary.installments.unwrap();
    assert_eq!(plan.installments.len(), 4);
    assert_eq!(plan.total(), Money::from_cents(2749));
}

#[test]
fn configured_policy_drives_pricing() {
    let config = StorefrontConfig::from_toml(
        r#"
        [pricing]
        tax_rate = 10
        free_shipping_threshold = 25
        default_shipping = "express"
        "#,
    )
    .unwrap();
    config.validate().unwrap();

    let (mut session, _) = session_with(config);
    session.add_item(line("1", 2000, 1)).unwrap();
    let quote = session.quote().unwrap();
    assert_eq!(quote.shipping, Money::from_cents(1999));
    assert_eq!(quote.tax, Money::from_cents(200));

    session.add_item(line("2", 500, 1)).unwrap();
    assert_eq!(session.quote().unwrap().shipping, Money::ZERO);
}

#[test]
fn session_resumes_from_store() {
    let store = Arc::new(InMemoryCartStore::new());
    let config = Arc::new(StorefrontConfig::default());

    {
        let handle: Arc<dyn CartStore> = store.clone();
        let mut session = CartSession::open("returning", Arc::clone(&config), handle).unwrap();
        session.add_item(line("1", 4000, 1)).unwrap();
        session.select_shipping("express").unwrap();
        session.apply_promo("welcome20").unwrap();
    }

    let handle: Arc<dyn CartStore> = store.clone();
    let session = CartSession::open("returning", config, handle).unwrap();
    let quote = session.quote().unwrap();
    assert_eq!(quote.subtotal, Money::from_cents(4000));
    assert_eq!(quote.shipping_option.id, "express");
    assert_eq!(quote.promo_code.as_deref(), Some("WELCOME20"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_sessions_share_one_store() {
    let store: Arc<dyn CartStore> = Arc::new(InMemoryCartStore::new());
    let config = Arc::new(StorefrontConfig::default());

    let handles: Vec<_> = (1..=8i64)
        .map(|n| {
            let store = Arc::clone(&store);
            let config = Arc::clone(&config);
            tokio::spawn(async move {
                let mut session =
                    CartSession::open(format!("cart-{}", n), config, store).unwrap();
                session.add_item(line("1", 1000, 1)).unwrap();
                session.set_quantity("1", n).unwrap();
                session.quote().unwrap().subtotal
            })
        })
        .collect();

    for (n, handle) in (1..=8i64).zip(handles) {
        assert_eq!(handle.await.unwrap(), Money::from_cents(1000 * n));
    }
}

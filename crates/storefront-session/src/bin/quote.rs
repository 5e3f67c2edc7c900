//! # Quote Tool
//!
//! Prices a cart file from the command line and prints the order summary.
//!
//! ## Usage
//! ```bash
//! # Price a cart with the default configuration
//! cargo run -p storefront-session --bin storefront-quote -- --cart cart.json
//!
//! # Apply a promo, pick a shipping tier and a payment method
//! cargo run -p storefront-session --bin storefront-quote -- \
//!     --cart cart.json --promo save10 --shipping express --method klarna
//!
//! # Use a specific config file
//! cargo run -p storefront-session --bin storefront-quote -- --cart cart.json --config ./storefront.toml
//! ```
//!
//! ## Cart File
//! A JSON array of line items:
//! ```json
//! [
//!   { "id": "1", "title": "Phone Case", "price": 20.0, "discount": 10, "quantity": 1 }
//! ]
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use storefront_core::checkout::PaymentMethod;
use storefront_core::LineItem;
use storefront_session::telemetry::init_tracing;
use storefront_session::{CartSession, CartStore, InMemoryCartStore, StorefrontConfig};
use tracing::info;

fn print_help() {
    println!("Storefront Quote Tool");
    println!();
    println!("Usage: storefront-quote --cart <PATH> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --cart <PATH>       JSON file with the cart line items (required)");
    println!("  -p, --promo <CODE>      Promo code to apply");
    println!("  -s, --shipping <ID>     Shipping option id (default: from config)");
    println!("  -m, --method <METHOD>   Payment method (default: card)");
    println!("      --config <PATH>     Config file (default: platform config dir)");
    println!("  -h, --help              Show this help message");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut cart_path: Option<PathBuf> = None;
    let mut promo: Option<String> = None;
    let mut shipping: Option<String> = None;
    let mut method = PaymentMethod::default();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--cart" | "-c" => {
                cart_path = value.map(PathBuf::from);
                i += 1;
            }
            "--promo" | "-p" => {
                promo = value;
                i += 1;
            }
            "--shipping" | "-s" => {
                shipping = value;
                i += 1;
            }
            "--method" | "-m" => {
                if let Some(value) = value {
                    method = value.parse()?;
                }
                i += 1;
            }
            "--config" => {
                config_path = value.map(PathBuf::from);
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let Some(cart_path) = cart_path else {
        print_help();
        return Err("missing --cart <PATH>".into());
    };

    init_tracing();

    let config = Arc::new(StorefrontConfig::load(config_path)?);
    let items: Vec<LineItem> = serde_json::from_str(&std::fs::read_to_string(&cart_path)?)?;
    info!(path = ?cart_path, lines = items.len(), "Loaded cart file");

    let store: Arc<dyn CartStore> = Arc::new(InMemoryCartStore::new());
    let mut session = CartSession::open("quote", Arc::clone(&config), store)?;

    for item in items {
        session.add_item(item)?;
    }
    if let Some(shipping) = shipping {
        session.select_shipping(&shipping)?;
    }
    if let Some(code) = promo {
        session.apply_promo(&code)?;
    }

    let summary = session.checkout(method)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

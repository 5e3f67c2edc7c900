//! # Storefront Configuration
//!
//! Pricing constants and catalogs, loaded in layers.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_TAX_RATE=8.25                                           │
//! │     STOREFRONT_FREE_SHIPPING_THRESHOLD=75                              │
//! │     STOREFRONT_DEFAULT_SHIPPING=express                                │
//! │     STOREFRONT_CURRENCY=usd                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.electrogadgets.storefront/...    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     8% tax, free shipping from $100, three shipping tiers,             │
//! │     SAVE10 / WELCOME20 / FREESHIP                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [store]
//! name = "ElectroGadgets"
//! currency = "usd"
//!
//! [pricing]
//! tax_rate = 8.0                  # percent
//! free_shipping_threshold = 100.0
//! default_shipping = "standard"
//!
//! [[shipping]]
//! id = "standard"
//! name = "Standard Shipping"
//! price = 9.99
//! etaLabel = "5-7 business days"
//!
//! [[promos]]
//! code = "SAVE10"
//! description = "10% off your order"
//! type = "percentage"
//! percent = 10
//! ```
//!
//! Omitting `[[shipping]]` or `[[promos]]` keeps the built-in catalogs;
//! listing any entry replaces the whole catalog.

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::validation::{
    validate_non_negative, validate_percent, validate_tax_rate_bps, validate_unique_ids,
};
use storefront_core::{
    Money, Percent, PricingEngine, PricingPolicy, PromoCatalog, PromoCode, PromoKind,
    ShippingCatalog, TaxRate, ValidationError,
};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// Store Settings
// =============================================================================

/// Identity of the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// ISO 4217 code used for charges.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_store_name() -> String {
    "ElectroGadgets".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency: default_currency(),
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Tax and shipping constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Sales tax in percent (`8` = 8%). Resolution is one basis point.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Percent,

    /// Subtotal at or above which shipping is free.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: Money,

    /// Shipping option selected for a fresh cart.
    #[serde(default = "default_shipping_id")]
    pub default_shipping: String,
}

fn default_tax_rate() -> Percent {
    Percent::from_decimal(TaxRate::default().fraction() * Decimal::ONE_HUNDRED)
}

fn default_free_shipping_threshold() -> Money {
    PricingPolicy::default().free_shipping_threshold
}

fn default_shipping_id() -> String {
    "standard".to_string()
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tax_rate: default_tax_rate(),
            free_shipping_threshold: default_free_shipping_threshold(),
            default_shipping: default_shipping_id(),
        }
    }
}

impl PricingSettings {
    /// Tax rate in basis points, if the percentage is representable.
    fn tax_rate_bps(&self) -> Option<u32> {
        let bps = self.tax_rate.value() * Decimal::ONE_HUNDRED;
        if bps.fract().is_zero() {
            bps.to_u32()
        } else {
            None
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    /// Shipping tiers offered at checkout.
    #[serde(default)]
    pub shipping: ShippingCatalog,

    /// Promo codes accepted in the cart.
    #[serde(default)]
    pub promos: PromoCatalog,
}

impl StorefrontConfig {
    /// Creates a config with the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document, normalising promo codes to upper case.
    pub fn from_toml(contents: &str) -> SessionResult<Self> {
        let mut config: StorefrontConfig = toml::from_str(contents)?;
        config.promos = PromoCatalog::new(
            config
                .promos
                .codes()
                .iter()
                .map(|promo| PromoCode::new(&promo.code, &promo.description, promo.kind.clone()))
                .collect(),
        );
        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSave("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SessionResult<()> {
        let invalid = |e: ValidationError| SessionError::InvalidConfig(e.to_string());

        validate_percent("tax_rate", self.pricing.tax_rate).map_err(invalid)?;
        let bps = self.pricing.tax_rate_bps().ok_or_else(|| {
            SessionError::InvalidConfig(format!(
                "tax_rate {} is finer than one basis point",
                self.pricing.tax_rate.value()
            ))
        })?;
        validate_tax_rate_bps(bps).map_err(invalid)?;
        validate_non_negative("free_shipping_threshold", self.pricing.free_shipping_threshold)
            .map_err(invalid)?;

        if self.shipping.is_empty() {
            return Err(SessionError::InvalidConfig(
                "at least one shipping option is required".into(),
            ));
        }
        validate_unique_ids("shipping", self.shipping.options().iter().map(|o| o.id.as_str()))
            .map_err(invalid)?;
        for option in self.shipping.options() {
            validate_non_negative("shipping price", option.price).map_err(invalid)?;
        }
        if !self.shipping.contains(&self.pricing.default_shipping) {
            return Err(SessionError::InvalidConfig(format!(
                "default_shipping '{}' is not in the shipping catalog",
                self.pricing.default_shipping
            )));
        }

        validate_unique_ids("promo", self.promos.codes().iter().map(|p| p.code.as_str()))
            .map_err(invalid)?;
        for promo in self.promos.codes() {
            if promo.code.trim().is_empty() {
                return Err(invalid(ValidationError::Required {
                    field: "promo code".into(),
                }));
            }
            match &promo.kind {
                PromoKind::Percentage { percent } => {
                    validate_percent("promo percent", *percent).map_err(invalid)?
                }
                PromoKind::Fixed { amount } => {
                    validate_non_negative("promo amount", *amount).map_err(invalid)?
                }
                PromoKind::FreeShipping => {}
            }
        }

        let currency = &self.store.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SessionError::InvalidConfig(format!(
                "currency must be a three-letter ISO code, got: {}",
                currency
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key/value source.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(rate) = lookup("STOREFRONT_TAX_RATE") {
            match Decimal::from_str(rate.trim()) {
                Ok(pct) => {
                    debug!(tax_rate = %pct, "Overriding tax rate from environment");
                    self.pricing.tax_rate = Percent::from_decimal(pct);
                }
                Err(_) => warn!(value = %rate, "Ignoring unparseable STOREFRONT_TAX_RATE"),
            }
        }

        if let Some(threshold) = lookup("STOREFRONT_FREE_SHIPPING_THRESHOLD") {
            match Decimal::from_str(threshold.trim()) {
                Ok(amount) => {
                    debug!(
                        threshold = %amount,
                        "Overriding free shipping threshold from environment"
                    );
                    self.pricing.free_shipping_threshold = Money::from_decimal(amount);
                }
                Err(_) => warn!(
                    value = %threshold,
                    "Ignoring unparseable STOREFRONT_FREE_SHIPPING_THRESHOLD"
                ),
            }
        }

        if let Some(id) = lookup("STOREFRONT_DEFAULT_SHIPPING") {
            debug!(shipping = %id, "Overriding default shipping from environment");
            self.pricing.default_shipping = id;
        }

        if let Some(currency) = lookup("STOREFRONT_CURRENCY") {
            self.store.currency = currency.to_lowercase();
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "electrogadgets", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Pricing policy built from the validated settings.
    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            tax_rate: self
                .pricing
                .tax_rate_bps()
                .map(TaxRate::from_bps)
                .unwrap_or_default(),
            free_shipping_threshold: self.pricing.free_shipping_threshold,
        }
    }

    /// A pricing engine over this config's shipping catalog and policy.
    pub fn pricing_engine(&self) -> PricingEngine {
        PricingEngine::new(self.shipping.clone(), self.pricing_policy())
    }

    /// Returns the default shipping option id.
    pub fn default_shipping(&self) -> &str {
        &self.pricing.default_shipping
    }

    /// Returns the charge currency.
    pub fn currency(&self) -> &str {
        &self.store.currency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pricing.tax_rate, Percent::whole(8));
        assert_eq!(config.pricing_policy(), PricingPolicy::default());
        assert_eq!(config.default_shipping(), "standard");
        assert_eq!(config.shipping.options().len(), 3);
        assert_eq!(config.promos.codes().len(), 3);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
            [store]
            currency = "eur"

            [pricing]
            tax_rate = 8.25
            free_shipping_threshold = 50
            default_shipping = "pickup"

            [[shipping]]
            id = "pickup"
            name = "Store Pickup"
            price = 0
            etaLabel = "Same day"

            [[shipping]]
            id = "courier"
            name = "Courier"
            price = 12.5
            etaLabel = "Next day"

            [[promos]]
            code = "spring15"
            description = "15% off"
            type = "percentage"
            percent = 15

            [[promos]]
            code = "FIVER"
            description = "$5 off"
            type = "fixed"
            amount = 5

            [[promos]]
            code = "SHIPFREE"
            description = "Free shipping"
            type = "free_shipping"
        "#;

        let config = StorefrontConfig::from_toml(toml).unwrap();
        assert!(config.validate().is_ok());

        assert_eq!(config.currency(), "eur");
        assert_eq!(config.pricing_policy().tax_rate, TaxRate::from_bps(825));
        assert_eq!(config.pricing.free_shipping_threshold, Money::from_cents(5000));
        assert_eq!(config.shipping.get("courier").unwrap().price, Money::from_cents(1250));
        assert!(!config.shipping.contains("standard"));

        let spring = config.promos.resolve("Spring15").unwrap();
        assert_eq!(spring.code, "SPRING15");
        assert_eq!(
            spring.kind,
            PromoKind::Percentage {
                percent: Percent::whole(15)
            }
        );
        assert!(config.promos.resolve("shipfree").unwrap().waives_shipping());
        assert!(config.promos.resolve("SAVE10").is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StorefrontConfig::from_toml("[pricing]\ntax_rate = 10\n").unwrap();
        assert_eq!(config.pricing_policy().tax_rate, TaxRate::from_bps(1000));
        assert_eq!(config.shipping, ShippingCatalog::default());
        assert_eq!(config.promos, PromoCatalog::default());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STOREFRONT_TAX_RATE", "6.5"),
            ("STOREFRONT_FREE_SHIPPING_THRESHOLD", "75"),
            ("STOREFRONT_DEFAULT_SHIPPING", "express"),
            ("STOREFRONT_CURRENCY", "CAD"),
        ]);

        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert!(config.validate().is_ok());
        assert_eq!(config.pricing.tax_rate.value(), dec!(6.5));
        assert_eq!(config.pricing_policy().tax_rate, TaxRate::from_bps(650));
        assert_eq!(config.pricing.free_shipping_threshold, Money::from_cents(7500));
        assert_eq!(config.default_shipping(), "express");
        assert_eq!(config.currency(), "cad");
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| {
            (key == "STOREFRONT_TAX_RATE").then(|| "eight".to_string())
        });
        assert_eq!(config.pricing.tax_rate, Percent::whole(8));
    }

    #[test]
    fn test_validation_rejects_bad_configs() {
        let mut config = StorefrontConfig::default();
        config.pricing.tax_rate = Percent::whole(101);
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.pricing.tax_rate = Percent::from_decimal(dec!(8.125));
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.pricing.default_shipping = "teleport".into();
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.shipping = ShippingCatalog::new(Vec::new());
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.store.currency = "dollars".into();
        assert!(config.validate().is_err());

        let duplicate = PromoCatalog::new(vec![
            PromoCode::new("A", "a", PromoKind::FreeShipping),
            PromoCode::new("a", "again", PromoKind::FreeShipping),
        ]);
        let config = StorefrontConfig {
            promos: duplicate,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir()
            .join(format!("storefront-missing-{}.toml", uuid::Uuid::new_v4()));
        let config = StorefrontConfig::load_or_default(Some(path));
        assert_eq!(config.pricing_policy(), PricingPolicy::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!("storefront-{}.toml", uuid::Uuid::new_v4()));
        let mut config = StorefrontConfig::default();
        config.pricing.default_shipping = "overnight".into();
        config.save(Some(path.clone())).unwrap();

        let loaded = StorefrontConfig::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.pricing.default_shipping, "overnight");
        assert_eq!(loaded.shipping, config.shipping);
        assert_eq!(loaded.promos, config.promos);

        std::fs::remove_file(path).ok();
    }
}

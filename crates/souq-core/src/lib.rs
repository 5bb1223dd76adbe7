//! # souq-core
//!
//! Core types and the pricing engine for souq-pricing.
//!
//! This crate provides:
//! - `CartLine` for cart contents
//! - `PricingSettings`, `RawSettings` and `PricingDefaults` for store settings
//! - `SettingsAdapter` to map backend settings into engine input
//! - `compute_pricing` producing a `PricingResult` with per-line tax
//! - `Storefront` and `StorefrontRegistry` for multi-tenant support
//! - `SettingsProvider` trait for settings sources
//! - `StoreError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use souq_core::{compute_pricing, CartLine, PricingDefaults, RawSettings, SettingsAdapter};
//!
//! let adapter = SettingsAdapter::new(PricingDefaults::default());
//! let settings = adapter.adapt(&RawSettings::default());
//!
//! let lines = vec![CartLine::new("Vintage denim jacket", 100.0, 1)];
//! let pricing = compute_pricing(&lines, &settings);
//!
//! assert_eq!(pricing.subtotal, 100.0);
//! assert_eq!(pricing.grand_total, 120.75);
//! ```

pub mod adapter;
pub mod cart;
pub mod error;
pub mod lenient;
pub mod money;
pub mod pricing;
pub mod provider;
pub mod settings;
pub mod storefront;

// Re-exports for convenience
pub use adapter::{adapt_settings, normalize_tax_rate, select_shipping_method, SettingsAdapter};
pub use cart::{item_count, CartLine};
pub use error::{StoreError, StoreResult};
pub use money::{delivery_label, format_money, round2};
pub use pricing::{compute_pricing, shipping_fee_for, LineBreakdown, PricingResult};
pub use provider::{
    BoxedSettingsProvider, SettingsProvider, SettingsProviderSelector, SettingsSource,
    StaticSettingsProvider,
};
pub use settings::{
    DeliverySettings, PricingDefaults, PricingSettings, RawSettings, RawShipping, RawTax,
    ShippingMethod, ShippingSettings, TaxMode,
};
pub use storefront::{Storefront, StorefrontRegistry};

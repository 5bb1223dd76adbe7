//! # souq-settings
//!
//! Upstream clients for souq-pricing.
//!
//! This crate provides:
//!
//! 1. **HttpSettingsProvider** - fetches a storefront's public settings
//!    - `/api/settings/public` payloads, bare or enveloped
//!    - TTL snapshot cache, stale snapshot on upstream failure
//!
//! 2. **FxRatesClient** - exchange-rate proxy
//!    - any upstream returning `{ base, rates }`
//!    - per-currency TTL cache
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use souq_core::{compute_pricing, SettingsAdapter, SettingsProvider};
//! use souq_settings::{HttpSettingsProvider, SettingsClientConfig};
//!
//! let config = SettingsClientConfig::from_env()?;
//! let provider = HttpSettingsProvider::new("https://api.souq.ae/api/settings/public", &config)?;
//!
//! let raw = provider.fetch_settings().await?;
//! let settings = SettingsAdapter::default().adapt(&raw);
//! let pricing = compute_pricing(&lines, &settings);
//! ```

pub mod cache;
pub mod config;
pub mod fx;
pub mod http;

// Re-exports
pub use cache::TtlCache;
pub use config::{FxConfig, SettingsClientConfig};
pub use fx::{normalize_currency, FxRates, FxRatesClient};
pub use http::HttpSettingsProvider;

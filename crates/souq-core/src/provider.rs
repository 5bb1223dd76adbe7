//! # Settings Provider Trait
//!
//! Seam between the pricing service and wherever a storefront's settings
//! come from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 SettingsProvider (trait)                    │
//! │  ├── fetch_settings()                                       │
//! │  └── source_name()                                          │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                ┌───────────┴───────────┐
//!                │                       │
//!   ┌────────────┴───────────┐ ┌─────────┴────────────┐
//!   │ StaticSettingsProvider │ │ HttpSettingsProvider │
//!   │   (inline config)      │ │   (souq-settings)    │
//!   └────────────────────────┘ └──────────────────────┘
//! ```

use crate::error::StoreResult;
use crate::settings::RawSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Source of a storefront's public settings payload.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Fetch the current settings payload.
    async fn fetch_settings(&self) -> StoreResult<RawSettings>;

    /// Provider name (for logging).
    fn source_name(&self) -> &'static str;
}

/// Type alias for a boxed settings provider (dynamic dispatch)
pub type BoxedSettingsProvider = Arc<dyn SettingsProvider>;

/// Where the settings behind a quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSource {
    /// Fetched (or configured) storefront settings
    Live,
    /// Fallback defaults after the provider failed
    Default,
}

/// Provider serving a fixed payload
#[derive(Debug, Clone, Default)]
pub struct StaticSettingsProvider {
    settings: RawSettings,
}

impl StaticSettingsProvider {
    pub fn new(settings: RawSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SettingsProvider for StaticSettingsProvider {
    async fn fetch_settings(&self) -> StoreResult<RawSettings> {
        Ok(self.settings.clone())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// Per-storefront provider lookup
#[derive(Clone, Default)]
pub struct SettingsProviderSelector {
    providers: HashMap<String, BoxedSettingsProvider>,
}

impl SettingsProviderSelector {
    /// Create an empty selector
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider for a storefront
    pub fn register(&mut self, site_id: impl Into<String>, provider: BoxedSettingsProvider) {
        self.providers.insert(site_id.into(), provider);
    }

    /// Provider for a storefront
    pub fn get(&self, site_id: &str) -> Option<&BoxedSettingsProvider> {
        self.providers.get(site_id)
    }

    /// Storefronts with a registered provider
    pub fn sites(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }
}

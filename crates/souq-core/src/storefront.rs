//! # Storefront Configuration
//!
//! Multi-tenant storefront configuration for souq-pricing.
//! Each storefront has its own settings source and may override the
//! platform-wide pricing defaults. Loaded from `config/storefronts.toml`.

use crate::error::StoreResult;
use crate::settings::{PricingDefaults, RawSettings};
use serde::{Deserialize, Serialize};

/// Configuration for a single tenant storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storefront {
    /// Unique storefront identifier (e.g., "souq", "souq-kids")
    pub id: String,

    /// Display name
    pub name: String,

    /// Primary domain (e.g., "souq.ae")
    pub domain: String,

    /// Public settings endpoint, e.g. `https://api.souq.ae/api/settings/public`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_url: Option<String>,

    /// Inline settings used when no `settings_url` is configured
    #[serde(default, skip_serializing)]
    pub settings: Option<RawSettings>,

    /// Per-storefront fallback configuration
    #[serde(default, skip_serializing)]
    pub defaults: Option<PricingDefaults>,

    /// Support email for this storefront
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,

    /// Whether this storefront is active
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Storefront {
    /// Create a new storefront with required fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            domain: domain.into(),
            settings_url: None,
            settings: None,
            defaults: None,
            support_email: None,
            active: true,
        }
    }

    /// Builder: set the public settings endpoint
    pub fn with_settings_url(mut self, url: impl Into<String>) -> Self {
        self.settings_url = Some(url.into());
        self
    }

    /// Builder: set inline settings
    pub fn with_settings(mut self, settings: RawSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Builder: set storefront-specific defaults
    pub fn with_defaults(mut self, defaults: PricingDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Builder: set support email
    pub fn with_support_email(mut self, email: impl Into<String>) -> Self {
        self.support_email = Some(email.into());
        self
    }

    /// Builder: set active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether settings are fetched live from the backend
    pub fn is_live(&self) -> bool {
        self.settings_url.is_some()
    }
}

/// Registry of all tenant storefronts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontRegistry {
    /// Platform-wide pricing defaults
    #[serde(default)]
    pub defaults: PricingDefaults,

    /// Storefronts from config
    #[serde(default)]
    pub sites: Vec<Storefront>,

    /// Default storefront ID (used when no site_id is specified)
    #[serde(default, rename = "default_site")]
    default_site_id: Option<String>,
}

impl StorefrontRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with a default storefront
    pub fn with_default(default_site_id: impl Into<String>) -> Self {
        Self {
            default_site_id: Some(default_site_id.into()),
            ..Self::default()
        }
    }

    /// Load registry from a TOML string
    pub fn from_toml(toml_str: &str) -> StoreResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Builder: set platform-wide defaults
    pub fn with_defaults(mut self, defaults: PricingDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add a storefront to the registry
    pub fn add(&mut self, site: Storefront) {
        self.sites.push(site);
    }

    /// Add a storefront with builder pattern
    pub fn with_site(mut self, site: Storefront) -> Self {
        self.add(site);
        self
    }

    /// Get an active storefront by ID
    pub fn get(&self, site_id: &str) -> Option<&Storefront> {
        self.sites.iter().find(|s| s.id == site_id && s.active)
    }

    /// Get the default storefront
    pub fn default_site(&self) -> Option<&Storefront> {
        self.default_site_id
            .as_ref()
            .and_then(|id| self.get(id))
            .or_else(|| self.active_sites().next())
    }

    /// Pricing defaults that apply to a storefront
    pub fn defaults_for(&self, site_id: &str) -> PricingDefaults {
        self.get(site_id)
            .and_then(|s| s.defaults.clone())
            .unwrap_or_else(|| self.defaults.clone())
    }

    /// List all active storefronts
    pub fn active_sites(&self) -> impl Iterator<Item = &Storefront> {
        self.sites.iter().filter(|s| s.active)
    }

    /// Check if a storefront exists and is active
    pub fn has_site(&self, site_id: &str) -> bool {
        self.get(site_id).is_some()
    }

    /// Get number of storefronts
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

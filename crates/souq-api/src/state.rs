//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the storefront registry, per-storefront settings providers and
//! the optional exchange-rate client.

use souq_core::{
    BoxedSettingsProvider, PricingSettings, SettingsAdapter, SettingsProviderSelector,
    SettingsSource, StaticSettingsProvider, StoreError, StoreResult, Storefront,
    StorefrontRegistry,
};
use souq_settings::{FxRatesClient, HttpSettingsProvider, SettingsClientConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Emit JSON logs instead of human-readable ones
    pub json_logs: bool,
    /// Explicit path to the storefronts file
    pub storefronts_path: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            storefronts_path: std::env::var("STOREFRONTS_CONFIG").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}: {}", addr, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            json_logs: false,
            storefronts_path: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Tenant storefronts and pricing defaults
    pub registry: Arc<StorefrontRegistry>,
    /// Settings provider per storefront
    pub providers: SettingsProviderSelector,
    /// Exchange-rate proxy (disabled when `FX_API_URL` is unset)
    pub fx: Option<Arc<FxRatesClient>>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState from environment and `config/storefronts.toml`
    pub fn new() -> anyhow::Result<Self> {
        Self::from_config(AppConfig::from_env())
    }

    /// Create a new AppState for an already loaded config
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let registry = load_storefronts(config.storefronts_path.as_deref())?;
        let client_config = SettingsClientConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Invalid settings client config: {}", e))?;

        let fx = FxRatesClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize exchange rates: {}", e))?;

        let state = Self::from_registry(config, registry, &client_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize settings providers: {}", e))?;

        Ok(match fx {
            Some(client) => state.with_fx(client),
            None => state,
        })
    }

    /// Build state from an already loaded registry
    pub fn from_registry(
        config: AppConfig,
        registry: StorefrontRegistry,
        client_config: &SettingsClientConfig,
    ) -> StoreResult<Self> {
        let mut providers = SettingsProviderSelector::new();
        for site in registry.active_sites() {
            let provider: BoxedSettingsProvider = match &site.settings_url {
                Some(url) => Arc::new(HttpSettingsProvider::new(url.clone(), client_config)?),
                None => Arc::new(StaticSettingsProvider::new(
                    site.settings.clone().unwrap_or_default(),
                )),
            };
            providers.register(site.id.clone(), provider);
        }

        Ok(Self {
            registry: Arc::new(registry),
            providers,
            fx: None,
            config,
        })
    }

    /// Builder: enable the exchange-rate proxy
    pub fn with_fx(mut self, client: FxRatesClient) -> Self {
        self.fx = Some(Arc::new(client));
        self
    }

    /// Pricing settings for a storefront.
    ///
    /// Provider failures never surface: the storefront's defaults are used
    /// instead and reported as [`SettingsSource::Default`].
    pub async fn settings_for(&self, site: &Storefront) -> (PricingSettings, SettingsSource) {
        let adapter = SettingsAdapter::new(self.registry.defaults_for(&site.id));

        let Some(provider) = self.providers.get(&site.id) else {
            let err = StoreError::ProviderMissing {
                site_id: site.id.clone(),
            };
            warn!("{}, using defaults", err);
            return (adapter.fallback(), SettingsSource::Default);
        };

        match provider.fetch_settings().await {
            Ok(raw) => (adapter.adapt(&raw), SettingsSource::Live),
            Err(err) => {
                warn!(
                    site_id = %site.id,
                    provider = provider.source_name(),
                    retryable = err.is_retryable(),
                    "Settings unavailable, using defaults: {}",
                    err
                );
                (adapter.fallback(), SettingsSource::Default)
            }
        }
    }
}

/// Load storefront registry from config file
fn load_storefronts(explicit_path: Option<&str>) -> anyhow::Result<StorefrontRegistry> {
    if let Some(path) = explicit_path {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
        return StorefrontRegistry::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e));
    }

    let config_paths = [
        "config/storefronts.toml",
        "../config/storefronts.toml",
        "../../config/storefronts.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let registry = StorefrontRegistry::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            info!("Loaded {} storefronts from {}", registry.len(), path);
            return Ok(registry);
        }
    }

    warn!("No storefront config found, using a single default storefront");
    let mut registry = StorefrontRegistry::with_default("default");
    registry.add(Storefront::new("default", "Default Storefront", "localhost"));
    Ok(registry)
}

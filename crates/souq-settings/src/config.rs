//! # Client Configuration
//!
//! Configuration for the settings and exchange-rate clients.
//! Values are loaded from environment variables (and `.env`).

use souq_core::StoreError;
use std::env;
use std::time::Duration;

const DEFAULT_SETTINGS_TTL_SECS: u64 = 60;
const DEFAULT_FX_TTL_SECS: u64 = 3600;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Placeholder substituted with the base currency in `FX_API_URL`
pub const BASE_PLACEHOLDER: &str = "{base}";

/// Read a whole-seconds duration through `lookup`.
fn duration_from<F>(lookup: &F, key: &str, default_secs: u64) -> Result<Duration, StoreError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
            StoreError::Configuration(format!("{} must be whole seconds, got {:?}", key, raw))
        }),
        None => Ok(Duration::from_secs(default_secs)),
    }
}

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Settings client configuration
#[derive(Debug, Clone)]
pub struct SettingsClientConfig {
    /// How long a fetched settings payload is served without refetching
    pub cache_ttl: Duration,

    /// Request timeout
    pub timeout: Duration,
}

impl SettingsClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `SETTINGS_CACHE_TTL_SECS` (default 60)
    /// - `SETTINGS_TIMEOUT_SECS` (default 10)
    pub fn from_env() -> Result<Self, StoreError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(env_lookup)
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            cache_ttl: duration_from(
                &lookup,
                "SETTINGS_CACHE_TTL_SECS",
                DEFAULT_SETTINGS_TTL_SECS,
            )?,
            timeout: duration_from(&lookup, "SETTINGS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        })
    }

    /// Builder: set cache TTL
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SettingsClientConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_SETTINGS_TTL_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Exchange-rate proxy configuration
#[derive(Debug, Clone)]
pub struct FxConfig {
    /// Upstream rates endpoint. `{base}` is replaced by the base currency;
    /// without the placeholder the currency is appended as a path segment.
    pub api_url: String,

    /// How long rates for one base currency are cached
    pub cache_ttl: Duration,

    /// Request timeout
    pub timeout: Duration,
}

impl FxConfig {
    /// Create config for an upstream URL with default TTL and timeout
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            cache_ttl: Duration::from_secs(DEFAULT_FX_TTL_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when `FX_API_URL` is unset, which disables the
    /// exchange-rate route.
    ///
    /// Optional env vars:
    /// - `FX_API_URL`
    /// - `FX_CACHE_TTL_SECS` (default 3600)
    /// - `FX_TIMEOUT_SECS` (default 10)
    pub fn from_env() -> Result<Option<Self>, StoreError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(env_lookup)
    }

    fn from_lookup<F>(lookup: F) -> Result<Option<Self>, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("FX_API_URL") {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => return Ok(None),
        };

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(StoreError::Configuration(
                "FX_API_URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(Some(Self {
            api_url,
            cache_ttl: duration_from(&lookup, "FX_CACHE_TTL_SECS", DEFAULT_FX_TTL_SECS)?,
            timeout: duration_from(&lookup, "FX_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        }))
    }

    /// Builder: set cache TTL
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Upstream URL for a base currency
    pub fn url_for(&self, base: &str) -> String {
        if self.api_url.contains(BASE_PLACEHOLDER) {
            self.api_url.replace(BASE_PLACEHOLDER, base)
        } else {
            format!("{}/{}", self.api_url.trim_end_matches('/'), base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_settings_config_defaults() {
        let config = SettingsClientConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_fx_url_for() {
        let templated = FxConfig::new("https://rates.example.com/v6/latest/{base}?src=souq");
        assert_eq!(
            templated.url_for("AED"),
            "https://rates.example.com/v6/latest/AED?src=souq"
        );

        let plain = FxConfig::new("https://rates.example.com/latest/");
        assert_eq!(plain.url_for("USD"), "https://rates.example.com/latest/USD");
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_fx_disabled_without_url() {
        assert!(FxConfig::from_lookup(vars(&[])).unwrap().is_none());
        assert!(FxConfig::from_lookup(vars(&[("FX_API_URL", "  ")])).unwrap().is_none());
    }

    #[test]
    fn test_fx_has_its_own_timeout() {
        let config = FxConfig::from_lookup(vars(&[
            ("FX_API_URL", "https://rates.example.com/latest/{base}"),
            ("FX_TIMEOUT_SECS", "3"),
            ("SETTINGS_TIMEOUT_SECS", "30"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));

        let settings = SettingsClientConfig::from_lookup(vars(&[("SETTINGS_TIMEOUT_SECS", "30")]))
            .unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_fx_rejects_bad_values() {
        assert!(FxConfig::from_lookup(vars(&[("FX_API_URL", "ftp://rates")])).is_err());
        assert!(FxConfig::from_lookup(vars(&[
            ("FX_API_URL", "https://rates.example.com"),
            ("FX_TIMEOUT_SECS", "soon"),
        ]))
        .is_err());
    }
}

//! # Exchange Rates
//!
//! Proxy for an upstream exchange-rate API so storefronts can show
//! approximate prices in a shopper's currency. Rates per base currency are
//! cached in memory for `FX_CACHE_TTL_SECS`.
//!
//! Accepted upstream shapes:
//!
//! ```text
//! { "base": "AED", "rates": { "USD": 0.2723, ... } }
//! { "result": "success", "base_code": "AED", "rates": { ... } }
//! ```

use crate::cache::TtlCache;
use crate::config::FxConfig;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use souq_core::{round2, StoreError, StoreResult};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Rates for one base currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRates {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    pub fetched_at: DateTime<Utc>,
}

impl FxRates {
    /// Rate from the base currency to `to`
    pub fn rate(&self, to: &str) -> Option<f64> {
        let to = to.to_ascii_uppercase();
        if to == self.base {
            return Some(1.0);
        }
        self.rates.get(&to).copied()
    }

    /// Convert an amount in the base currency, rounded to 2 decimals
    pub fn convert(&self, amount: f64, to: &str) -> Option<f64> {
        self.rate(to).map(|rate| round2(amount * rate))
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamRates {
    #[serde(default)]
    result: Option<String>,
    #[serde(default, alias = "base_code")]
    base: Option<String>,
    #[serde(default)]
    rates: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
}

/// Validate and normalise an ISO 4217 code
pub fn normalize_currency(code: &str) -> StoreResult<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(StoreError::InvalidRequest(format!(
            "Invalid currency code: {:?}",
            code
        )))
    }
}

/// Caching exchange-rate client
pub struct FxRatesClient {
    config: FxConfig,
    client: Client,
    cache: TtlCache<String, FxRates>,
}

impl FxRatesClient {
    /// Create a client for the configured upstream
    pub fn new(config: FxConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                StoreError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;
        let cache = TtlCache::new(config.cache_ttl);

        Ok(Self {
            config,
            client,
            cache,
        })
    }

    /// Create from environment variables; `None` when FX is not configured
    pub fn from_env() -> StoreResult<Option<Self>> {
        FxConfig::from_env()?.map(Self::new).transpose()
    }

    /// Current rates for a base currency
    #[instrument(skip(self))]
    pub async fn rates(&self, base: &str) -> StoreResult<FxRates> {
        let base = normalize_currency(base)?;

        if let Some(cached) = self.cache.get(&base).await {
            debug!("Serving cached rates");
            return Ok(cached);
        }

        match self.load(&base).await {
            Ok(rates) => {
                self.cache.insert(base, rates.clone()).await;
                Ok(rates)
            }
            Err(err) => match self.cache.get_stale(&base).await {
                Some(stale) => {
                    warn!("Rate fetch failed, serving stale rates: {}", err);
                    Ok(stale)
                }
                None => Err(err),
            },
        }
    }

    async fn load(&self, base: &str) -> StoreResult<FxRates> {
        let url = self.config.url_for(base);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Upstream {
                service: "fx".to_string(),
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("error").to_string(),
            });
        }

        let upstream: UpstreamRates = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(format!("Failed to parse rates: {}", e)))?;

        if upstream.result.as_deref() == Some("error") {
            return Err(StoreError::Upstream {
                service: "fx".to_string(),
                status: status.as_u16(),
                message: upstream.error_type.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let rates: BTreeMap<String, f64> = upstream
            .rates
            .iter()
            .filter_map(|(code, value)| {
                souq_core::lenient::coerce_f64(value)
                    .filter(|rate| *rate > 0.0)
                    .map(|rate| (code.to_ascii_uppercase(), rate))
            })
            .collect();

        if rates.is_empty() {
            return Err(StoreError::Serialization(
                "Rates response contained no usable rates".to_string(),
            ));
        }

        Ok(FxRates {
            base: upstream
                .base
                .map(|b| b.to_ascii_uppercase())
                .unwrap_or_else(|| base.to_string()),
            rates,
            fetched_at: Utc::now(),
        })
    }
}

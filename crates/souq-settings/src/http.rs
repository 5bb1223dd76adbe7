//! # HTTP Settings Provider
//!
//! Fetches a storefront's `/api/settings/public` payload from the store
//! backend. The last good payload is cached for the configured TTL and
//! served stale when the backend is unreachable.

use crate::cache::TtlCache;
use crate::config::SettingsClientConfig;
use async_trait::async_trait;
use reqwest::Client;
use souq_core::{RawSettings, SettingsProvider, StoreError, StoreResult};
use tracing::{debug, instrument, warn};

/// Longest upstream error body kept in error messages
const MAX_ERROR_BODY: usize = 512;

/// Settings provider backed by the store backend's public settings endpoint
pub struct HttpSettingsProvider {
    url: String,
    client: Client,
    cache: TtlCache<String, RawSettings>,
}

impl HttpSettingsProvider {
    /// Create a provider for a settings URL
    pub fn new(url: impl Into<String>, config: &SettingsClientConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                StoreError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self::with_client(url, client, config))
    }

    /// Create a provider sharing an existing HTTP client
    pub fn with_client(
        url: impl Into<String>,
        client: Client,
        config: &SettingsClientConfig,
    ) -> Self {
        Self {
            url: url.into(),
            client,
            cache: TtlCache::new(config.cache_ttl),
        }
    }

    /// Settings endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Drop the cached payload so the next fetch goes upstream
    pub async fn invalidate(&self) {
        self.cache.invalidate(&self.url).await;
    }

    /// Fetch and parse the payload, bypassing the cache
    async fn load(&self) -> StoreResult<RawSettings> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Upstream {
                service: "settings".to_string(),
                status: status.as_u16(),
                message: truncate(&body, MAX_ERROR_BODY),
            });
        }

        RawSettings::from_json(&body).map_err(|e| {
            StoreError::Serialization(format!("Failed to parse settings payload: {}", e))
        })
    }
}

#[async_trait]
impl SettingsProvider for HttpSettingsProvider {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_settings(&self) -> StoreResult<RawSettings> {
        if let Some(cached) = self.cache.get(&self.url).await {
            debug!("Serving cached settings");
            return Ok(cached);
        }

        match self.load().await {
            Ok(settings) => {
                debug!(methods = settings.shipping.methods.len(), "Fetched settings");
                self.cache.insert(self.url.clone(), settings.clone()).await;
                Ok(settings)
            }
            Err(err) => match self.cache.get_stale(&self.url).await {
                Some(stale) => {
                    warn!("Settings fetch failed, serving stale snapshot: {}", err);
                    Ok(stale)
                }
                None => Err(err),
            },
        }
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> serde_json::Value {
        json!({
            "settings": {
                "currency": "AED",
                "tax": { "rate": 0.05, "displayMode": "tax_exclusive", "taxOnShipping": true },
                "shipping": {
                    "methods": [
                        {
                            "code": "standard",
                            "label": "Standard",
                            "fee": 15,
                            "etaDaysMin": 2,
                            "etaDaysMax": 4
                        }
                    ],
                    "defaultMethodCode": "standard",
                    "freeThreshold": 199
                }
            }
        })
    }

    fn provider(server: &MockServer, ttl: Duration) -> HttpSettingsProvider {
        let config = SettingsClientConfig::default().with_cache_ttl(ttl);
        HttpSettingsProvider::new(format!("{}/api/settings/public", server.uri()), &config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_settings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/settings/public"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server, Duration::from_secs(60));

        let first = provider.fetch_settings().await.unwrap();
        let second = provider.fetch_settings().await.unwrap();

        assert_eq!(first.tax.rate, Some(0.05));
        assert_eq!(first.shipping.methods[0].code, "standard");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_upstream_error_without_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = provider(&server, Duration::from_secs(60))
            .fetch_settings()
            .await
            .unwrap_err();

        match err {
            StoreError::Upstream { status, message, .. } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_serves_stale_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        // Zero TTL: every call goes upstream.
        let provider = provider(&server, Duration::ZERO);

        let fresh = provider.fetch_settings().await.unwrap();
        let stale = provider.fetch_settings().await.unwrap();

        assert_eq!(fresh, stale);
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider(&server, Duration::from_secs(60))
            .fetch_settings()
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_network_error_is_retryable() {
        let config = SettingsClientConfig::default().with_timeout(Duration::from_millis(500));
        let provider =
            HttpSettingsProvider::new("http://127.0.0.1:9/api/settings/public", &config).unwrap();

        let err = provider.fetch_settings().await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc…");
        assert_eq!(truncate("ééé", 3), "é…");
    }
}

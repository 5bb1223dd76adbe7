use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use souq_api::{create_router, AppConfig, AppState};
use souq_core::{RawSettings, Storefront, StorefrontRegistry};
use souq_settings::{FxConfig, FxRatesClient, SettingsClientConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn souq_settings() -> RawSettings {
    RawSettings::from_value(json!({
        "settings": {
            "currency": "aed",
            "tax": { "rate": 5, "displayMode": "tax_exclusive", "taxOnShipping": true },
            "shipping": {
                "methods": [
                    { "code": "standard", "label": "Standard", "fee": 15, "etaDaysMin": 2, "etaDaysMax": 4 },
                    { "code": "express", "label": "Express", "fee": 35, "etaDaysMin": 1, "etaDaysMax": 1 }
                ],
                "defaultMethodCode": "standard",
                "freeThreshold": 199
            }
        }
    }))
    .unwrap()
}

fn inclusive_settings() -> RawSettings {
    RawSettings::from_value(json!({
        "currency": "AED",
        "tax": { "rate": 0.05, "displayMode": "tax_inclusive", "taxOnShipping": false },
        "shipping": { "methods": [], "freeThreshold": 199 }
    }))
    .unwrap()
}

fn server_with(registry: StorefrontRegistry) -> TestServer {
    let state = AppState::from_registry(
        AppConfig::default(),
        registry,
        &SettingsClientConfig::default(),
    )
    .unwrap();
    TestServer::new(create_router(state)).unwrap()
}

fn test_server() -> TestServer {
    let registry = StorefrontRegistry::with_default("souq")
        .with_site(Storefront::new("souq", "Souq", "souq.ae").with_settings(souq_settings()))
        .with_site(
            Storefront::new("souq-kids", "Souq Kids", "kids.souq.ae")
                .with_settings(inclusive_settings()),
        )
        .with_site(Storefront::new("archive", "Archive", "archive.souq.ae").with_active(false));
    server_with(registry)
}

#[tokio::test]
async fn test_health() {
    let server = test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "souq-pricing");
}

#[tokio::test]
async fn test_quote_exclusive_default_site() {
    let server = test_server();

    let response = server
        .post("/api/v1/quote")
        .json(&json!({ "lines": [{ "name": "Linen shirt", "unitPrice": 100, "quantity": 1 }] }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["siteId"], "souq");
    assert_eq!(body["source"], "live");
    assert_eq!(body["settings"]["currency"], "AED");
    assert_eq!(body["pricing"]["subtotal"], 100.0);
    assert_eq!(body["pricing"]["shippingFee"], 15.0);
    assert_eq!(body["pricing"]["taxAmount"], 5.75);
    assert_eq!(body["pricing"]["grandTotal"], 120.75);
    assert_eq!(body["freeShipping"], false);
    assert_eq!(body["display"]["grandTotal"], "AED 120.75");
    assert_eq!(body["display"]["deliveryLabel"], "2-4 business days");
}

#[tokio::test]
async fn test_quote_inclusive_site() {
    let server = test_server();

    let response = server
        .post("/api/v1/souq-kids/quote")
        .json(&json!({ "lines": [{ "name": "Kids sneakers", "price": "100", "qty": 1 }] }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["siteId"], "souq-kids");
    assert_eq!(body["pricing"]["taxMode"], "tax_inclusive");
    assert_eq!(body["pricing"]["taxAmount"], 4.76);
    assert_eq!(body["pricing"]["grandTotal"], 115.0);
}

#[tokio::test]
async fn test_quote_free_shipping_threshold() {
    let server = test_server();

    let response = server
        .post("/api/v1/souq/quote")
        .json(&json!({ "lines": [{ "name": "Leather bag", "unitPrice": 199, "quantity": 1 }] }))
        .await;

    let body: Value = response.json();
    assert_eq!(body["pricing"]["shippingFee"], 0.0);
    assert_eq!(body["freeShipping"], true);
}

#[tokio::test]
async fn test_quote_empty_cart_still_charges_shipping() {
    let server = test_server();

    let response = server.post("/api/v1/quote").json(&json!({})).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["pricing"]["subtotal"], 0.0);
    assert_eq!(body["pricing"]["grandTotal"], 15.75);
}

#[tokio::test]
async fn test_quote_malformed_lines_price_as_empty_cart() {
    let server = test_server();

    for body in [
        json!({ "lines": null }),
        json!({ "lines": "cart" }),
        json!({ "lines": ["junk", 42, null] }),
    ] {
        let response = server.post("/api/v1/quote").json(&body).await;
        response.assert_status_ok();

        let quote: Value = response.json();
        assert_eq!(quote["pricing"]["subtotal"], 0.0);
        assert_eq!(quote["pricing"]["lines"], json!([]));
        assert_eq!(quote["pricing"]["grandTotal"], 15.75);
    }
}

#[tokio::test]
async fn test_quote_skips_malformed_entries() {
    let server = test_server();

    let response = server
        .post("/api/v1/quote")
        .json(&json!({
            "lines": ["junk", { "name": "Linen shirt", "unitPrice": 100, "quantity": 1 }]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["pricing"]["lines"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["pricing"]["grandTotal"], 120.75);
}

#[tokio::test]
async fn test_quote_huge_quantities_do_not_fail() {
    let server = test_server();

    let response = server
        .post("/api/v1/quote")
        .json(&json!({ "lines": [
            { "name": "A", "unitPrice": 1, "quantity": i64::MAX },
            { "name": "B", "unitPrice": 1, "quantity": i64::MAX }
        ] }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_quote_unknown_site() {
    let server = test_server();

    let response = server
        .post("/api/v1/nowhere/quote")
        .json(&json!({ "lines": [] }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_inactive_site_is_hidden() {
    let server = test_server();

    server
        .get("/api/v1/sites/archive")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let body: Value = server.get("/api/v1/sites").await.json();
    assert_eq!(body["sites"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["default_site"], "souq");
}

#[tokio::test]
async fn test_get_site_hides_inline_settings() {
    let server = test_server();

    let response = server.get("/api/v1/sites/souq").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["domain"], "souq.ae");
    assert!(body.get("settings").is_none());
}

#[tokio::test]
async fn test_settings_endpoint() {
    let server = test_server();

    let body: Value = server.get("/api/v1/souq-kids/settings").await.json();
    assert_eq!(body["source"], "live");
    assert_eq!(body["settings"]["taxMode"], "tax_inclusive");
    assert_eq!(body["settings"]["taxRatePercent"], 5.0);
    assert_eq!(body["settings"]["taxOnShipping"], false);
    assert_eq!(body["settings"]["shipping"]["baseFee"], 15.0);
}

#[tokio::test]
async fn test_failing_backend_falls_back_to_defaults() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/settings/public"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend)
        .await;

    let registry = StorefrontRegistry::with_default("souq").with_site(
        Storefront::new("souq", "Souq", "souq.ae")
            .with_settings_url(format!("{}/api/settings/public", backend.uri())),
    );
    let server = server_with(registry);

    let response = server
        .post("/api/v1/quote")
        .json(&json!({ "lines": [{ "name": "Linen shirt", "unitPrice": 100, "quantity": 1 }] }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["source"], "default");
    assert_eq!(body["pricing"]["currency"], "AED");
    assert_eq!(body["pricing"]["grandTotal"], 120.75);
}

#[tokio::test]
async fn test_live_backend_settings() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/settings/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "currency": "SAR",
                "tax": { "rate": 15, "displayMode": "tax_exclusive", "taxOnShipping": false },
                "shipping": { "methods": [{ "code": "std", "fee": 20 }], "freeThreshold": 500 }
            }
        })))
        .mount(&backend)
        .await;

    let registry = StorefrontRegistry::with_default("souq-ksa").with_site(
        Storefront::new("souq-ksa", "Souq KSA", "souq.sa")
            .with_settings_url(format!("{}/api/settings/public", backend.uri())),
    );
    let server = server_with(registry);

    let body: Value = server
        .post("/api/v1/souq-ksa/quote")
        .json(&json!({ "lines": [{ "name": "Abaya", "unitPrice": 200, "quantity": 1 }] }))
        .await
        .json();

    assert_eq!(body["source"], "live");
    assert_eq!(body["pricing"]["currency"], "SAR");
    assert_eq!(body["pricing"]["shippingFee"], 20.0);
    assert_eq!(body["pricing"]["taxAmount"], 30.0);
    assert_eq!(body["pricing"]["grandTotal"], 250.0);
}

#[tokio::test]
async fn test_fx_disabled() {
    let server = test_server();

    let response = server.get("/api/v1/fx/AED").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_fx_rates() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest/AED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "base": "AED",
            "rates": { "USD": 0.2723, "EUR": 0.251 }
        })))
        .mount(&upstream)
        .await;

    let registry = StorefrontRegistry::with_default("souq")
        .with_site(Storefront::new("souq", "Souq", "souq.ae").with_settings(souq_settings()));
    let fx = FxRatesClient::new(FxConfig::new(format!("{}/latest/{{base}}", upstream.uri())))
        .unwrap();
    let state = AppState::from_registry(
        AppConfig::default(),
        registry,
        &SettingsClientConfig::default(),
    )
    .unwrap()
    .with_fx(fx);
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.get("/api/v1/fx/aed").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["base"], "AED");
    assert_eq!(body["rates"]["USD"], 0.2723);

    server
        .get("/api/v1/fx/dirham")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

//! # Request Handlers
//!
//! Axum request handlers for the pricing API.
//! Every storefront-scoped route has a legacy twin that uses the default
//! storefront.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use souq_core::{
    compute_pricing, format_money, lenient, CartLine, PricingResult, PricingSettings, SettingsSource,
    StoreError, Storefront,
};
use souq_settings::FxRates;
use tracing::{error, info, instrument};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Quote request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Cart lines to price; a missing or malformed list is an empty cart
    #[serde(default, alias = "items", deserialize_with = "lenient::cart_lines")]
    pub lines: Vec<CartLine>,
    /// Site ID for multi-tenant (optional, can also be in URL path)
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub site_id: Option<String>,
}

/// Pre-formatted amounts for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDisplay {
    pub subtotal: String,
    pub shipping_fee: String,
    pub tax_amount: String,
    pub grand_total: String,
    pub delivery_label: String,
}

impl QuoteDisplay {
    fn new(pricing: &PricingResult, settings: &PricingSettings) -> Self {
        let currency = pricing.currency.as_str();
        Self {
            subtotal: format_money(pricing.subtotal, currency),
            shipping_fee: format_money(pricing.shipping_fee, currency),
            tax_amount: format_money(pricing.tax_amount, currency),
            grand_total: format_money(pricing.grand_total, currency),
            delivery_label: settings.delivery.label.clone(),
        }
    }
}

/// Quote response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote_id: Uuid,
    pub site_id: String,
    /// Whether storefront settings or fallback defaults were used
    pub source: SettingsSource,
    pub settings: PricingSettings,
    pub pricing: PricingResult,
    pub free_shipping: bool,
    pub display: QuoteDisplay,
    /// RFC 3339 timestamp
    pub computed_at: String,
}

/// Adapted settings for a storefront
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub site_id: String,
    pub source: SettingsSource,
    pub settings: PricingSettings,
}

/// Storefront listing
#[derive(Debug, Serialize)]
pub struct SitesResponse {
    pub sites: Vec<Storefront>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_site: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn store_error_to_response(err: StoreError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if err.is_retryable() {
        response = response.with_details("retryable");
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Resolve a storefront; the default one when no ID is given.
/// Unknown and inactive IDs are not found.
fn find_site(state: &AppState, site_id: Option<&str>) -> Result<Storefront, ApiError> {
    let site = match site_id {
        Some(id) => state.registry.get(id),
        None => state.registry.default_site(),
    };
    site.cloned().ok_or_else(|| {
        store_error_to_response(StoreError::StorefrontNotFound {
            site_id: site_id.unwrap_or("default").to_string(),
        })
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "souq-pricing",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Price a cart (legacy route - uses default site unless the body names one)
#[instrument(skip(state, request), fields(lines = request.lines.len()))]
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let site = find_site(&state, request.site_id.as_deref())?;
    Ok(Json(quote_internal(&state, &site, &request.lines).await))
}

/// Price a cart for a specific site (multi-tenant route)
#[instrument(skip(state, request), fields(site_id = %site_id, lines = request.lines.len()))]
pub async fn quote_for_site(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let site = find_site(&state, Some(&site_id))?;
    Ok(Json(quote_internal(&state, &site, &request.lines).await))
}

/// Internal quote computation (shared logic)
async fn quote_internal(
    state: &AppState,
    site: &Storefront,
    lines: &[CartLine],
) -> QuoteResponse {
    let (settings, source) = state.settings_for(site).await;
    let pricing = compute_pricing(lines, &settings);

    info!(
        "Quote: site={}, source={:?}, {} items, total={}",
        site.id,
        source,
        pricing.item_count(),
        format_money(pricing.grand_total, &pricing.currency)
    );

    QuoteResponse {
        quote_id: Uuid::new_v4(),
        site_id: site.id.clone(),
        source,
        free_shipping: pricing.has_free_shipping(),
        display: QuoteDisplay::new(&pricing, &settings),
        settings,
        pricing,
        computed_at: Utc::now().to_rfc3339(),
    }
}

/// Adapted pricing settings for the default site
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let site = find_site(&state, None)?;
    Ok(Json(settings_internal(&state, site).await))
}

/// Adapted pricing settings for a specific site
#[instrument(skip(state))]
pub async fn get_settings_for_site(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let site = find_site(&state, Some(&site_id))?;
    Ok(Json(settings_internal(&state, site).await))
}

async fn settings_internal(state: &AppState, site: Storefront) -> SettingsResponse {
    let (settings, source) = state.settings_for(&site).await;
    SettingsResponse {
        site_id: site.id,
        source,
        settings,
    }
}

/// List all active sites
pub async fn list_sites(State(state): State<AppState>) -> Json<SitesResponse> {
    Json(SitesResponse {
        sites: state.registry.active_sites().cloned().collect(),
        default_site: state.registry.default_site().map(|s| s.id.clone()),
    })
}

/// Get a single site
pub async fn get_site(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
) -> Result<Json<Storefront>, ApiError> {
    find_site(&state, Some(&site_id)).map(Json)
}

/// Exchange rates for a base currency
#[instrument(skip(state))]
pub async fn fx_rates(
    State(state): State<AppState>,
    Path(base): Path<String>,
) -> Result<Json<FxRates>, ApiError> {
    let client = state
        .fx
        .as_ref()
        .ok_or_else(|| store_error_to_response(StoreError::FxDisabled))?;

    client.rates(&base).await.map(Json).map_err(|e| {
        error!("Failed to fetch exchange rates: {}", e);
        store_error_to_response(e)
    })
}

//! # Routes
//!
//! Axum router configuration for the pricing API.
//! Supports both legacy default-storefront and multi-tenant routes.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Legacy (default storefront):
///   - POST /api/v1/quote - Price a cart
///   - GET  /api/v1/settings - Adapted pricing settings
///
/// - Multi-tenant:
///   - POST /api/v1/{site_id}/quote - Price a cart for site
///   - GET  /api/v1/{site_id}/settings - Adapted pricing settings for site
///   - GET  /api/v1/sites - List all sites
///   - GET  /api/v1/sites/{site_id} - Get site info
///
/// - Exchange rates:
///   - GET /api/v1/fx/{base} - Rates for a base currency
pub fn create_router(state: AppState) -> Router {
    // Storefront SPAs call from their own domains
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let legacy_api_routes = Router::new()
        .route("/quote", post(handlers::quote))
        .route("/settings", get(handlers::get_settings))
        .route("/sites", get(handlers::list_sites))
        .route("/sites/{site_id}", get(handlers::get_site))
        .route("/fx/{base}", get(handlers::fx_rates));

    let site_api_routes = Router::new()
        .route("/{site_id}/quote", post(handlers::quote_for_site))
        .route("/{site_id}/settings", get(handlers::get_settings_for_site));

    let api_routes = Router::new()
        // Static segments first (more specific)
        .merge(legacy_api_routes)
        // Then multi-tenant routes
        .merge(site_api_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

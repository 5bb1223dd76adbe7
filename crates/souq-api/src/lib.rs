//! # souq-api
//!
//! HTTP API layer for souq-pricing.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Quote endpoints running the shared pricing engine
//! - Storefront, settings and exchange-rate lookups
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/quote` | Price a cart (default storefront) |
//! | POST | `/api/v1/{site_id}/quote` | Price a cart for a storefront |
//! | GET | `/api/v1/settings` | Adapted settings (default storefront) |
//! | GET | `/api/v1/{site_id}/settings` | Adapted settings for a storefront |
//! | GET | `/api/v1/sites` | List storefronts |
//! | GET | `/api/v1/sites/{site_id}` | Get storefront |
//! | GET | `/api/v1/fx/{base}` | Exchange rates |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};

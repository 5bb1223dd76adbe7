//! # Souq Pricing
//!
//! Order pricing service for Souq storefronts.
//!
//! ## Usage
//!
//! ```bash
//! # Optional environment variables
//! export PORT=8080
//! export LOG_FORMAT=json
//! export FX_API_URL=https://open.er-api.com/v6/latest/{base}
//!
//! # Run the server (reads config/storefronts.toml)
//! souq-pricing
//! ```

use souq_api::{routes, AppConfig, AppState};
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let json_logs = config.json_logs;

    // Initialize logging
    tracing_subscriber::registry()
        .with((!json_logs).then(fmt::layer))
        .with(json_logs.then(|| fmt::layer().json()))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    if !json_logs {
        print_banner();
    }

    // Initialize application state
    let state = AppState::from_config(config)?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Storefronts loaded: {}", state.registry.len());
    info!("Settings providers: {:?}", state.providers.sites());
    info!(
        "Exchange rates: {}",
        if state.fx.is_some() { "enabled" } else { "disabled" }
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🛍️  Souq pricing starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("🧾 Quote: POST http://{}/api/v1/quote", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

fn print_banner() {
    println!(
        r#"
  🛍️  Souq Pricing
  ━━━━━━━━━━━━━━━━━━━━━━━
  Tax, shipping & totals engine
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}

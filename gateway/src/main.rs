mod api;
mod handlers;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use phantom_core::runtime::Runtime;
use phantom_core::AppConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::handlers::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging Setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    info!("Phantom Shell Gateway Initializing...");

    // 2. Configuration (read once, never reloaded)
    let config = AppConfig::from_env().context("Invalid configuration")?;
    if config.slack_webhook_url.is_none() {
        info!("SLACK_WEBHOOK_URL not set; slack_webhook needs params.webhook_url per call.");
    }

    // 3. Initialize The Runtime (Tools + Brain)
    let runtime = Runtime::from_config(&config).context("Failed to initialize runtime")?;
    info!("Loaded {} tools.", runtime.registry().catalog().len());

    // Quick connectivity check, only when there is a key to check
    if runtime.brain().is_live() {
        match runtime.brain().say_hello().await {
            Ok(msg) => info!("Brain Status: {}", msg),
            Err(e) => error!("Brain is configured but unresponsive: {:#}", e),
        }
    }

    // 4. Define Routes
    let app = router(AppState {
        runtime: Arc::new(runtime),
    });

    // 5. Start Server
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Gateway listening on {}...", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Gateway stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

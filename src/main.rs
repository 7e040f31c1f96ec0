mod api;
mod app_state;
mod config;
mod core;
mod domain;
mod errors;
mod routes;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app_state::build_app_state;
use crate::config::AppConfig;
use crate::routes::app_router;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    let _guard = init_tracing(&config)?;

    info!("🚀 Starting fleetlens interval service");
    info!(
        "Upstream {} (retries={}, timeout={}s), max_points={}, page_size={}, utc_offset={}m",
        config.api_base_url,
        config.fetch_retries,
        config.fetch_timeout_secs,
        config.max_points,
        config.page_size,
        config.utc_offset_minutes
    );

    let state = build_app_state(&config)?;
    let app = app_router().with_state(state);

    let listener = TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_addr))?;
    info!("✅ Listening on {}", config.server_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Server error: {}", e);
        return Err(e.into());
    }

    info!("👋 Server stopped");
    Ok(())
}

/// stdout plus a daily rolling file under `log_dir`.
fn init_tracing(config: &AppConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log dir {:?}", config.log_dir))?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "fleetlens.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("🛑 Shutdown signal received");
}

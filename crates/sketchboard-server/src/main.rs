use clap::Parser;
use eyre::{Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sketchboard_server::{ServerConfig, build_state, router};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let config = ServerConfig::parse();

    let log_level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = config.bind_addr()?;
    let state = build_state(&config)
        .await
        .map_err(|e| eyre!("Failed to initialize server: {}", e))?;
    let app = router(state, &config.api_prefix, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| eyre!("Failed to bind {}: {}", addr, e))?;
    info!("Sketch API listening on {} (prefix {})", addr, config.api_prefix);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            warn!("Received Ctrl+C, shutting down gracefully...");
        })
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

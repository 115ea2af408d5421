use anyhow::{Context, Result};
use hbnb::api::{create_router, AppState};
use hbnb::config::{load_config, HbnbConfig};
use hbnb::storage::{FileStorage, Storage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hbnb=info".into()),
        )
        .init();

    info!("hbnb starting...");

    let config_path = PathBuf::from(
        std::env::var("HBNB_CONFIG").unwrap_or_else(|_| "hbnb.toml".to_string()),
    );
    let mut config = if config_path.exists() {
        load_config(&config_path)?
    } else {
        info!(
            path = %config_path.display(),
            "Config file not found, using defaults"
        );
        HbnbConfig::default()
    };
    config.apply_env();

    info!(
        file_path = %config.storage.file_path.display(),
        bind = %config.bind_address(),
        "Configuration loaded"
    );

    // Load persisted objects
    let storage = Arc::new(FileStorage::with_path(config.storage.file_path.clone()));
    storage.reload();
    info!(objects = storage.count(None), "Storage ready");

    let router = create_router(AppState::new(storage.clone(), config.api.max_body_bytes));

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .context("Failed to bind API address")?;
    info!(address = %config.bind_address(), "API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    info!("Shutdown signal received");

    if let Err(e) = storage.save() {
        warn!(error = %e, "Final save failed");
    }
    info!("hbnb stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl_c signal");
    }
}

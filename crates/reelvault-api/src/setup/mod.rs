//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a served router.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use reelvault_core::Config;
use reelvault_processing::VideoProber;
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration, before anything is connected
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let videos = database::setup_video_store(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let prober = VideoProber::new(
        config.ffprobe_path(),
        Duration::from_secs(config.probe_timeout_secs()),
    )
    .context("Invalid FFPROBE_PATH")?;

    let state = Arc::new(AppState::new(config.clone(), videos, storage, prober));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

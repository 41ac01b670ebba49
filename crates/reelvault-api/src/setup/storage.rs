//! Storage setup

use anyhow::{Context, Result};
use reelvault_core::Config;
use reelvault_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage backend...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(
        backend = %storage.backend_type(),
        signed_url_expiry_secs = config.signed_url_expiry_secs(),
        "Storage backend initialized"
    );
    Ok(storage)
}

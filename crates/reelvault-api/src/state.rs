//! Application state.
//!
//! Built once at startup and shared read-only behind an `Arc`; handlers never
//! read process-wide configuration.

use crate::auth::JwtService;
use reelvault_core::{AssetKind, Config};
use reelvault_db::VideoStore;
use reelvault_processing::{MediaValidator, VideoProber};
use reelvault_storage::{AssetResolver, Storage};
use std::path::PathBuf;
use std::sync::Arc;

/// Storage, signing, probing and validation for uploaded assets.
#[derive(Clone)]
pub struct MediaConfig {
    pub storage: Arc<dyn Storage>,
    pub resolver: AssetResolver,
    pub prober: VideoProber,
    pub thumbnail_validator: MediaValidator,
    pub video_validator: MediaValidator,
    /// Directory video bodies are spooled into before probing
    pub spool_dir: PathBuf,
}

impl MediaConfig {
    pub fn new(config: &Config, storage: Arc<dyn Storage>, prober: VideoProber) -> Self {
        let resolver = AssetResolver::new(
            storage.clone(),
            std::time::Duration::from_secs(config.signed_url_expiry_secs()),
        );
        Self {
            storage,
            resolver,
            prober,
            thumbnail_validator: MediaValidator::for_kind(
                AssetKind::Thumbnail,
                config.max_thumbnail_size_bytes(),
            ),
            video_validator: MediaValidator::for_kind(
                AssetKind::Video,
                config.max_video_size_bytes(),
            ),
            spool_dir: config
                .upload_temp_dir()
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
        }
    }

    pub fn validator_for(&self, kind: AssetKind) -> &MediaValidator {
        match kind {
            AssetKind::Thumbnail => &self.thumbnail_validator,
            AssetKind::Video => &self.video_validator,
        }
    }
}

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub media: MediaConfig,
    pub jwt: JwtService,
    pub is_production: bool,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        prober: VideoProber,
    ) -> Self {
        let media = MediaConfig::new(&config, storage, prober);
        let jwt = JwtService::new(config.jwt_secret(), config.jwt_issuer());
        let is_production = config.is_production();
        Self {
            config,
            videos,
            media,
            jwt,
            is_production,
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}

//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p reelvault-api`. No database is
//! needed; records live in `InMemoryVideoStore` and assets in a temp dir.

pub mod fixtures;

use axum_test::TestServer;
use reelvault_api::constants;
use reelvault_api::setup::routes;
use reelvault_api::state::AppState;
use reelvault_core::{Config, NewVideo, UploadServiceConfig, VideoRecord};
use reelvault_db::{InMemoryVideoStore, VideoStore};
use reelvault_processing::VideoProber;
use reelvault_storage::{LocalStorage, Storage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_ASSETS_URL: &str = "http://localhost:8091/assets";

/// API path prefix for tests (e.g. `/api`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the stores behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub videos: Arc<InMemoryVideoStore>,
    pub storage: Arc<LocalStorage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn assets_dir(&self) -> &Path {
        self.storage.base_path()
    }

    /// Directory video bodies are spooled into before probing.
    pub fn spool_dir(&self) -> &Path {
        &self.state.media.spool_dir
    }

    /// Bearer token for `user_id`, signed with the app's secret.
    pub fn token_for(&self, user_id: Uuid) -> String {
        self.state
            .jwt
            .issue_access_token(
                user_id,
                chrono::Duration::hours(constants::ACCESS_TOKEN_TTL_HOURS),
            )
            .expect("Failed to issue test token")
    }

    /// Create a record owned by `user_id`.
    pub async fn create_video(&self, user_id: Uuid) -> VideoRecord {
        self.videos
            .create_video(NewVideo {
                title: "Harbour at dusk".to_string(),
                description: "Boats coming in".to_string(),
                user_id,
            })
            .await
            .expect("Failed to create test video")
    }

    pub async fn stored_video(&self, id: Uuid) -> VideoRecord {
        self.videos
            .get_video(id)
            .await
            .expect("Failed to read test video")
            .expect("Test video missing")
    }

    /// Storage key behind a URL returned by the API.
    pub fn key_of(&self, url: &str) -> String {
        url.strip_prefix(TEST_ASSETS_URL)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or_else(|| panic!("{} is not a local asset URL", url))
            .to_string()
    }

    /// Every file currently under the storage root.
    pub fn stored_files(&self) -> Vec<PathBuf> {
        fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
            for entry in std::fs::read_dir(dir).expect("Failed to read assets dir") {
                let path = entry.expect("Failed to read dir entry").path();
                if path.is_dir() {
                    walk(&path, out);
                } else {
                    out.push(path);
                }
            }
        }
        let mut files = Vec::new();
        walk(self.assets_dir(), &mut files);
        files
    }
}

/// How the scripted ffprobe behind a test app behaves.
pub enum FakeProber {
    /// Reports one video stream of the given width and height.
    Dimensions(u32, u32),
    /// Exits non-zero without output.
    Failing,
}

fn test_config(temp_dir: &Path, ffprobe_path: &str, production: bool) -> Config {
    let mut vars: HashMap<&str, String> = HashMap::from([
        ("JWT_SECRET", TEST_JWT_SECRET.to_string()),
        ("ENVIRONMENT", "test".to_string()),
        ("STORAGE_BACKEND", "local".to_string()),
        (
            "LOCAL_STORAGE_PATH",
            temp_dir.join("assets").display().to_string(),
        ),
        ("LOCAL_STORAGE_BASE_URL", TEST_ASSETS_URL.to_string()),
        ("UPLOAD_TEMP_DIR", temp_dir.join("spool").display().to_string()),
        ("MAX_THUMBNAIL_SIZE_MB", "1".to_string()),
        ("MAX_VIDEO_SIZE_MB", "2".to_string()),
        ("FFPROBE_PATH", ffprobe_path.to_string()),
        ("PROBE_TIMEOUT_SECS", "5".to_string()),
    ]);
    if production {
        vars.insert("ENVIRONMENT", "production".to_string());
        vars.insert("DATABASE_URL", "postgres://localhost/reelvault_test".to_string());
        vars.insert("CORS_ORIGINS", "http://localhost:3000".to_string());
    }
    let config = UploadServiceConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to build test config");
    Config(Box::new(config))
}

/// Setup a test app around the given scripted prober. `production` switches
/// the environment, which hides error details in responses.
pub async fn setup_test_app_with(prober: FakeProber, production: bool) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let ffprobe = match prober {
        FakeProber::Dimensions(width, height) => {
            fixtures::fake_ffprobe(temp_dir.path(), width, height)
        }
        FakeProber::Failing => fixtures::failing_ffprobe(temp_dir.path()),
    };

    let config = test_config(temp_dir.path(), &ffprobe, production);
    config.validate().expect("Test config should validate");

    let storage = Arc::new(
        LocalStorage::new(config.local_storage_path(), TEST_ASSETS_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );
    let videos = Arc::new(InMemoryVideoStore::new());
    let prober = VideoProber::new(ffprobe, Duration::from_secs(config.probe_timeout_secs()))
        .expect("Failed to create prober");

    let state = Arc::new(AppState::new(
        config.clone(),
        videos.clone() as Arc<dyn VideoStore>,
        storage.clone() as Arc<dyn Storage>,
        prober,
    ));
    let router = routes::setup_routes(&config, state.clone()).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        state,
        videos,
        storage,
        _temp_dir: temp_dir,
    }
}

/// Setup a test app whose prober reports `width`x`height` for every file.
pub async fn setup_test_app_with_dimensions(width: u32, height: u32) -> TestApp {
    setup_test_app_with(FakeProber::Dimensions(width, height), false).await
}

/// Setup a test app with a landscape-reporting prober.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_dimensions(1920, 1080).await
}

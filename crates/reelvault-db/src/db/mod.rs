//! Video record repositories

pub mod memory;
pub mod video;

pub use memory::InMemoryVideoStore;
pub use video::VideoRepository;

use reelvault_core::{AppError, NewVideo, VideoRecord};
use uuid::Uuid;

/// Record store operations used by the upload pipeline
#[async_trait::async_trait]
pub trait VideoStore: Send + Sync {
    async fn create_video(&self, input: NewVideo) -> Result<VideoRecord, AppError>;

    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Replace the full record. Fails with `NotFound` if it no longer exists.
    async fn update_video(&self, video: &VideoRecord) -> Result<VideoRecord, AppError>;
}

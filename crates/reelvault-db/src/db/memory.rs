use std::collections::HashMap;

use chrono::Utc;
use reelvault_core::{AppError, NewVideo, VideoRecord};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::VideoStore;

/// In-process video store, used when no database is configured outside
/// production and by the API tests.
#[derive(Default)]
pub struct InMemoryVideoStore {
    videos: RwLock<HashMap<Uuid, VideoRecord>>,
}

impl InMemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record as-is
    pub async fn insert(&self, video: VideoRecord) {
        self.videos.write().await.insert(video.id, video);
    }
}

#[async_trait::async_trait]
impl VideoStore for InMemoryVideoStore {
    async fn create_video(&self, input: NewVideo) -> Result<VideoRecord, AppError> {
        let video = VideoRecord::new(input);
        self.videos.write().await.insert(video.id, video.clone());
        Ok(video)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, video: &VideoRecord) -> Result<VideoRecord, AppError> {
        let mut videos = self.videos.write().await;
        let slot = videos
            .get_mut(&video.id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))?;

        let mut updated = video.clone();
        updated.created_at = slot.created_at;
        updated.updated_at = Utc::now();
        *slot = updated.clone();
        Ok(updated)
    }
}

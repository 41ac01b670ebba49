use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::{AssetKind, AssetReference};
use crate::error::AppError;

/// A video entity owned by a single user.
///
/// `thumbnail_url` and `video_url` hold the stored form of an [`AssetReference`]:
/// either a direct URL or a `bucket,key` composite that must be signed before it
/// reaches a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
}

impl VideoRecord {
    pub fn new(input: NewVideo) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: input.title,
            description: input.description,
            thumbnail_url: None,
            video_url: None,
            user_id: input.user_id,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Raw stored reference for an asset slot
    pub fn asset_url(&self, kind: AssetKind) -> Option<&str> {
        match kind {
            AssetKind::Thumbnail => self.thumbnail_url.as_deref(),
            AssetKind::Video => self.video_url.as_deref(),
        }
    }

    /// Parsed reference for an asset slot. A stored value that is neither a URL
    /// nor a `bucket,key` composite is an internal inconsistency.
    pub fn asset_reference(&self, kind: AssetKind) -> Result<Option<AssetReference>, AppError> {
        self.asset_url(kind).map(AssetReference::parse).transpose()
    }

    pub fn set_asset(&mut self, kind: AssetKind, reference: &AssetReference) {
        let stored = Some(reference.to_string());
        match kind {
            AssetKind::Thumbnail => self.thumbnail_url = stored,
            AssetKind::Video => self.video_url = stored,
        }
        self.updated_at = Utc::now();
    }
}

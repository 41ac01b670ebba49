//! Read-time resolution of stored asset references.
//!
//! Every path that hands a video record to a client goes through
//! [`AssetResolver::resolve_record`], so a raw `bucket,key` composite never
//! leaves the service.

use std::sync::Arc;
use std::time::Duration;

use reelvault_core::{AppError, AssetKind, AssetReference, VideoRecord};

use crate::traits::{Storage, StorageError, StorageResult};

#[derive(Clone)]
pub struct AssetResolver {
    storage: Arc<dyn Storage>,
    expires_in: Duration,
}

impl AssetResolver {
    pub fn new(storage: Arc<dyn Storage>, expires_in: Duration) -> Self {
        Self {
            storage,
            expires_in,
        }
    }

    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Client-usable URL for a reference. Direct URLs pass through untouched;
    /// composites are exchanged for a signed URL.
    pub async fn resolve(&self, reference: &AssetReference) -> StorageResult<String> {
        match reference {
            AssetReference::Direct(url) => Ok(url.clone()),
            AssetReference::Composite { bucket, key } => {
                let owned_key = self.storage.key_for_reference(reference).ok_or_else(|| {
                    StorageError::SigningFailed(format!(
                        "Cannot sign {} in bucket {} with the configured backend",
                        key, bucket
                    ))
                })?;
                self.storage
                    .get_presigned_url(&owned_key, self.expires_in)
                    .await
            }
        }
    }

    /// Copy of the record with both asset slots resolved for a client.
    pub async fn resolve_record(&self, mut record: VideoRecord) -> Result<VideoRecord, AppError> {
        for kind in [AssetKind::Thumbnail, AssetKind::Video] {
            let Some(reference) = record.asset_reference(kind)? else {
                continue;
            };
            if !reference.is_composite() {
                continue;
            }
            let url = self
                .resolve(&reference)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
            match kind {
                AssetKind::Thumbnail => record.thumbnail_url = Some(url),
                AssetKind::Video => record.video_url = Some(url),
            }
        }
        Ok(record)
    }
}

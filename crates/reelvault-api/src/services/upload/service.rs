use axum::extract::Multipart;
use reelvault_core::{AppError, AssetKind, AssetReference, VideoRecord};
use reelvault_storage::generate_asset_key;
use uuid::Uuid;

use super::multipart::{read_named_field, spool_named_field};
use crate::auth::AuthenticatedUser;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Runs the upload pipeline against the shared application state.
///
/// Callers have already parsed the video id and authenticated the request.
pub struct UploadService<'a> {
    state: &'a AppState,
}

impl<'a> UploadService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Load a record and check that `user` owns it.
    pub async fn load_owned_video(
        &self,
        video_id: Uuid,
        user: AuthenticatedUser,
    ) -> Result<VideoRecord, HttpAppError> {
        let video = self
            .state
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user.user_id) {
            return Err(AppError::Unauthorized("Not the owner of this video".to_string()).into());
        }

        Ok(video)
    }

    /// Delete the object behind a superseded stored reference if the active
    /// backend owns it. Unparseable references and failed deletes are logged
    /// and swallowed; neither aborts the upload.
    async fn delete_superseded(&self, kind: AssetKind, previous: Option<&str>) {
        let Some(raw) = previous else {
            return;
        };
        let previous = match AssetReference::parse(raw) {
            Ok(reference) => reference,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    asset = %kind,
                    reference = %raw,
                    "Superseded asset reference is malformed; skipping cleanup"
                );
                return;
            }
        };
        let Some(key) = self.state.media.storage.key_for_reference(&previous) else {
            tracing::debug!(
                asset = %kind,
                reference = %previous,
                "Superseded asset not owned by the active backend; leaving it"
            );
            return;
        };

        if let Err(e) = self.state.media.storage.delete(&key).await {
            tracing::warn!(
                error = %e,
                asset = %kind,
                key = %key,
                "Failed to delete superseded asset"
            );
        }
    }

    #[tracing::instrument(skip(self, user, multipart), fields(video_id = %video_id, user_id = %user.user_id))]
    pub async fn upload_thumbnail(
        &self,
        video_id: Uuid,
        user: AuthenticatedUser,
        mut multipart: Multipart,
    ) -> Result<VideoRecord, HttpAppError> {
        let kind = AssetKind::Thumbnail;
        let upload = read_named_field(
            &mut multipart,
            kind,
            self.state.media.validator_for(kind),
        )
        .await?;

        let mut video = self.load_owned_video(video_id, user).await?;

        self.delete_superseded(kind, video.asset_url(kind)).await;

        let key = generate_asset_key(None, &upload.content_type)?;
        let size = upload.data.len();
        let reference = self
            .state
            .media
            .storage
            .upload_with_key(&key, upload.data, &upload.content_type)
            .await?;

        video.set_asset(kind, &reference);
        let updated = self.state.videos.update_video(&video).await?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            content_type = %upload.content_type,
            "Thumbnail uploaded"
        );

        Ok(self.state.media.resolver.resolve_record(updated).await?)
    }

    #[tracing::instrument(skip(self, user, multipart), fields(video_id = %video_id, user_id = %user.user_id))]
    pub async fn upload_video(
        &self,
        video_id: Uuid,
        user: AuthenticatedUser,
        mut multipart: Multipart,
    ) -> Result<VideoRecord, HttpAppError> {
        let kind = AssetKind::Video;
        let mut video = self.load_owned_video(video_id, user).await?;
        let previous = video.asset_url(kind).map(String::from);

        let upload = spool_named_field(
            &mut multipart,
            kind,
            self.state.media.validator_for(kind),
            &self.state.media.spool_dir,
        )
        .await?;

        let aspect = self.state.media.prober.classify(&upload.path).await?;
        let key = generate_asset_key(Some(aspect), &upload.content_type)?;

        // `upload.path` stays alive until the end of this function
        let reference = self
            .state
            .media
            .storage
            .upload_stream(
                &key,
                &upload.content_type,
                Some(upload.size),
                Box::pin(upload.file),
            )
            .await?;

        video.set_asset(kind, &reference);
        let updated = self.state.videos.update_video(&video).await?;

        tracing::info!(
            key = %key,
            aspect = %aspect,
            size_bytes = upload.size,
            "Video uploaded"
        );

        if previous.as_deref() != video.asset_url(kind) {
            self.delete_superseded(kind, previous.as_deref()).await;
        }

        Ok(self.state.media.resolver.resolve_record(updated).await?)
    }
}

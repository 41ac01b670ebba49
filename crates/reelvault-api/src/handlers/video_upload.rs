use crate::auth::authenticate;
use crate::error::HttpAppError;
use crate::handlers::parse_video_id;
use crate::services::upload::UploadService;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use reelvault_core::VideoRecord;
use std::sync::Arc;

/// `POST /api/video_upload/{videoID}`
///
/// Multipart field `video`, `video/mp4` only. The body is spooled to a
/// temporary file, probed for its aspect ratio and streamed to storage under
/// `landscape/`, `portrait/` or `other/`.
#[tracing::instrument(skip(state, headers, multipart))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let user = authenticate(&state.jwt, &headers)?;

    let video = UploadService::new(&state)
        .upload_video(video_id, user, multipart)
        .await?;

    Ok(Json(video))
}

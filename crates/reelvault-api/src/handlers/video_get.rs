use crate::auth::authenticate;
use crate::error::HttpAppError;
use crate::handlers::parse_video_id;
use crate::services::upload::UploadService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use reelvault_core::VideoRecord;
use std::sync::Arc;

#[tracing::instrument(skip(state, headers))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(video_id): Path<String>,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let user = authenticate(&state.jwt, &headers)?;

    let video = UploadService::new(&state)
        .load_owned_video(video_id, user)
        .await?;
    let video = state.media.resolver.resolve_record(video).await?;

    Ok(Json(video))
}

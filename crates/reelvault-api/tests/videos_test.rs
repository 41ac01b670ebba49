//! Video upload and read-path integration tests.
//!
//! Run with: `cargo test -p reelvault-api --test videos_test`
//! Upload tests use a scripted ffprobe and only run on unix.

mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::{fake_mp4, form};
use helpers::{
    api_path, setup_test_app, setup_test_app_with, setup_test_app_with_dimensions, FakeProber,
    TestApp, TEST_ASSETS_URL,
};
use reelvault_api::services::upload::multipart::SPOOL_FILE_PREFIX;
use reelvault_api::ErrorResponse;
use reelvault_core::VideoRecord;
use reelvault_storage::Storage;
use uuid::Uuid;

async fn upload(app: &TestApp, video_id: Uuid, user: Uuid, data: Vec<u8>) -> VideoRecord {
    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", video_id)))
        .authorization_bearer(app.token_for(user))
        .multipart(form("video", data, "clip.mp4", "video/mp4"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json()
}

#[cfg(unix)]
#[tokio::test]
async fn test_landscape_video_is_stored_under_prefix() {
    let app = setup_test_app_with_dimensions(1920, 1080).await;
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;
    let data = fake_mp4(1);

    let body = upload(&app, video.id, owner, data.clone()).await;

    let url = body.video_url.expect("video_url should be set");
    assert!(url.starts_with(&format!("{}/landscape/", TEST_ASSETS_URL)));
    assert!(url.ends_with(".mp4"));
    assert_eq!(app.storage.download(&app.key_of(&url)).await.unwrap(), data);

    let stored = app.stored_video(video.id).await;
    assert_eq!(stored.video_url.as_deref(), Some(url.as_str()));
    assert!(stored.thumbnail_url.is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_portrait_video_is_stored_under_prefix() {
    let app = setup_test_app_with_dimensions(1080, 1920).await;
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;

    let body = upload(&app, video.id, owner, fake_mp4(2)).await;

    let key = app.key_of(&body.video_url.unwrap());
    assert!(key.starts_with("portrait/"), "unexpected key {}", key);
}

#[cfg(unix)]
#[tokio::test]
async fn test_square_video_is_other() {
    let app = setup_test_app_with_dimensions(1000, 1000).await;
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;

    let body = upload(&app, video.id, owner, fake_mp4(3)).await;

    let key = app.key_of(&body.video_url.unwrap());
    assert!(key.starts_with("other/"), "unexpected key {}", key);
}

#[cfg(unix)]
#[tokio::test]
async fn test_video_reupload_replaces_previous_object() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;

    let first = upload(&app, video.id, owner, fake_mp4(4)).await;
    let second_data = fake_mp4(5);
    let second = upload(&app, video.id, owner, second_data.clone()).await;

    let first_key = app.key_of(&first.video_url.unwrap());
    let second_key = app.key_of(&second.video_url.unwrap());
    assert_ne!(first_key, second_key);

    assert!(!app.storage.exists(&first_key).await.unwrap());
    assert_eq!(app.storage.download(&second_key).await.unwrap(), second_data);
    assert_eq!(app.stored_files().len(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_malformed_previous_video_reference_does_not_block_upload() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let mut video = app.create_video(owner).await;
    video.video_url = Some("bad".to_string());
    app.videos.insert(video.clone()).await;

    let body = upload(&app, video.id, owner, fake_mp4(7)).await;

    let key = app.key_of(&body.video_url.expect("video_url should be set"));
    assert!(key.starts_with("landscape/"), "unexpected key {}", key);
    assert_eq!(app.stored_files().len(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_ffprobe_leaves_no_trace() {
    let app = setup_test_app_with(FakeProber::Failing, false).await;
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", video.id)))
        .authorization_bearer(app.token_for(owner))
        .multipart(form("video", fake_mp4(8), "clip.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = response.json();
    assert_eq!(error.code, "MEDIA_PROBE_ERROR");
    assert!(error.details.is_none());

    assert_eq!(app.stored_video(video.id).await, video);
    assert!(app.stored_files().is_empty());

    let leftovers: Vec<_> = std::fs::read_dir(app.spool_dir())
        .expect("spool dir should exist after an upload")
        .map(|entry| entry.expect("Failed to read dir entry").file_name())
        .filter(|name| name.to_string_lossy().starts_with(SPOOL_FILE_PREFIX))
        .collect();
    assert!(leftovers.is_empty(), "spooled files left behind: {:?}", leftovers);
}

#[tokio::test]
async fn test_non_mp4_is_rejected() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", video.id)))
        .authorization_bearer(app.token_for(owner))
        .multipart(form("video", fake_mp4(6), "clip.mov", "video/quicktime"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = response.json();
    assert_eq!(error.code, "INVALID_INPUT");
    assert_eq!(app.stored_video(video.id).await, video);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_video_non_owner_is_rejected() {
    let app = setup_test_app().await;
    let video = app.create_video(Uuid::new_v4()).await;

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", video.id)))
        .authorization_bearer(app.token_for(Uuid::new_v4()))
        .multipart(form("video", fake_mp4(7), "clip.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.stored_video(video.id).await, video);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_oversized_video_is_413() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;
    let too_big = vec![0u8; 2 * 1024 * 1024 + 1];

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", video.id)))
        .authorization_bearer(app.token_for(owner))
        .multipart(form("video", too_big, "clip.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.stored_video(video.id).await, video);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_video_upload_unknown_video_is_404() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", Uuid::new_v4())))
        .authorization_bearer(app.token_for(Uuid::new_v4()))
        .multipart(form("video", fake_mp4(8), "clip.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_video_for_owner() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let video = app.create_video(owner).await;

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", video.id)))
        .authorization_bearer(app.token_for(owner))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: VideoRecord = response.json();
    assert_eq!(body, video);
}

#[tokio::test]
async fn test_get_video_rejects_other_users() {
    let app = setup_test_app().await;
    let video = app.create_video(Uuid::new_v4()).await;

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", video.id)))
        .authorization_bearer(app.token_for(Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", Uuid::new_v4())))
        .authorization_bearer(app.token_for(Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/health")).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "local");
}

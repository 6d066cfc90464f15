//! Handler functions for the video API.
//!
//! These functions process video upload and listing requests. The bytes
//! themselves are handed straight to the media host; only the resulting
//! asset metadata is persisted alongside the owner.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;

use crate::auth::middleware::CurrentUser;
use crate::database::models::{VideoDoc, VideoView};
use crate::errors::ApiError;
use crate::utils::{text_field, ApiResponse, FilePart};
use crate::AppState;

#[derive(Default)]
struct UploadForm {
    title: Option<String>,
    description: Option<String>,
    thumbnail: Option<FilePart>,
    video_file: Option<FilePart>,
}

async fn collect_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("invalid multipart payload: {err}")))?
    {
        match field.name() {
            Some("title") => form.title = Some(text_field(field).await?),
            Some("description") => form.description = Some(text_field(field).await?),
            Some("thumbnail") => form.thumbnail = Some(FilePart::from_field(field).await?),
            Some("videoFile") => form.video_file = Some(FilePart::from_field(field).await?),
            _ => {}
        }
    }
    Ok(form)
}

/// POST /api/v1/videos/upload
pub async fn upload_video(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<VideoView>>), ApiError> {
    let form = collect_upload_form(multipart).await?;

    let title = form
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("title is required"))?;
    let description = form
        .description
        .filter(|description| !description.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("description is required"))?;
    let thumbnail = form
        .thumbnail
        .ok_or_else(|| ApiError::bad_request("thumbnail is required"))?;
    let video_file = form
        .video_file
        .ok_or_else(|| ApiError::bad_request("video file is required"))?;

    let owner = current.object_id()?;
    let thumbnail_asset = state.media.upload(&thumbnail.filename, thumbnail.bytes).await?;
    let video_asset = state.media.upload(&video_file.filename, video_file.bytes).await?;

    let document = VideoDoc {
        id: ObjectId::new(),
        title,
        description,
        thumbnail: thumbnail_asset.url,
        video_file: video_asset.url,
        duration: video_asset.duration.unwrap_or(0.0),
        owner,
        created_at: DateTime::now(),
    };
    state.videos.insert(&document).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(document.into(), "video uploaded successfully")),
    ))
}

/// GET /api/v1/videos
pub async fn list_videos(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<Vec<VideoView>>>, ApiError> {
    let owner = current.object_id()?;
    let videos = state
        .videos
        .list_by_owner(&owner)
        .await?
        .into_iter()
        .map(VideoView::from)
        .collect();
    Ok(Json(ApiResponse::ok(videos, "videos fetched successfully")))
}

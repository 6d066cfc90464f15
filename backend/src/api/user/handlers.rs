//! Handler functions for user profile and management API endpoints.
//!
//! These functions process requests for user data beyond the core
//! authentication flow: current-user lookup, account and image updates,
//! channel profiles, watch history, and user search.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::middleware::CurrentUser;
use crate::auth::models::UserView;
use crate::errors::ApiError;
use crate::services::profile_aggregator::{self, ChannelProfile, HistoryEntry};
use crate::utils::{ApiResponse, FilePart};
use crate::AppState;

/// GET /api/v1/users/current-user
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<ApiResponse<UserView>> {
    Json(ApiResponse::ok(user.into(), "current user fetched successfully"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub full_name: String,
    pub email: String,
}

/// PATCH /api/v1/users/update-account
pub async fn update_account(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    if request.full_name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(ApiError::bad_request("full name and email are required"));
    }

    let id = current.object_id()?;
    let updated = state
        .users
        .update_account(&id, &request.full_name, &request.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("user does not exist".to_string()))?;

    Ok(Json(ApiResponse::ok(
        updated.into_domain().into(),
        "account details updated successfully",
    )))
}

/// Pull exactly one expected file field out of a multipart body.
async fn single_file(mut multipart: Multipart, name: &'static str) -> Result<FilePart, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("invalid multipart payload: {err}")))?
    {
        if field.name() == Some(name) {
            return FilePart::from_field(field).await;
        }
    }
    Err(ApiError::bad_request(format!("{name} file is required")))
}

/// PATCH /api/v1/users/avatar
pub async fn update_avatar(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    let file = single_file(multipart, "avatar").await?;
    let asset = state.media.upload(&file.filename, file.bytes).await?;

    let id = current.object_id()?;
    let updated = state
        .users
        .set_avatar(&id, &asset.url)
        .await?
        .ok_or_else(|| ApiError::NotFound("user does not exist".to_string()))?;

    Ok(Json(ApiResponse::ok(
        updated.into_domain().into(),
        "avatar updated successfully",
    )))
}

/// PATCH /api/v1/users/cover-image
pub async fn update_cover_image(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    let file = single_file(multipart, "coverImage").await?;
    let asset = state.media.upload(&file.filename, file.bytes).await?;

    let id = current.object_id()?;
    let updated = state
        .users
        .set_cover_image(&id, &asset.url)
        .await?
        .ok_or_else(|| ApiError::NotFound("user does not exist".to_string()))?;

    Ok(Json(ApiResponse::ok(
        updated.into_domain().into(),
        "cover image updated successfully",
    )))
}

/// GET /api/v1/users/channel/:username
pub async fn channel_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<ChannelProfile>>, ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::bad_request("username is missing"));
    }

    let viewer = current.object_id()?;
    let profile = profile_aggregator::channel_profile(&state.db, &username, viewer)
        .await?
        .ok_or_else(|| ApiError::NotFound("channel does not exist".to_string()))?;

    Ok(Json(ApiResponse::ok(profile, "user channel fetched successfully")))
}

/// GET /api/v1/users/history
pub async fn watch_history(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<Vec<HistoryEntry>>>, ApiError> {
    let viewer = current.object_id()?;
    let entries = profile_aggregator::watch_history(&state.db, viewer).await?;
    Ok(Json(ApiResponse::ok(entries, "watch history fetched successfully")))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub username: Option<String>,
}

/// GET /api/v1/users/search?username=
pub async fn search_user(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    let username = query
        .username
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("username is required"))?;

    let found = state
        .users
        .find_by_username(&username.to_lowercase())
        .await?
        .ok_or_else(|| ApiError::NotFound("username does not exist".to_string()))?;

    Ok(Json(ApiResponse::ok(
        found.into_domain().into(),
        "user fetched successfully",
    )))
}

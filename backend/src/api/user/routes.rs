//! Defines the HTTP routes for user profile and management endpoints.
//!
//! These routes map profile-related API paths to their handlers; they are
//! merged with the authentication routes under `/api/v1/users`.

use axum::routing::{get, patch};
use axum::Router;

use super::handlers::{
    channel_profile, current_user, search_user, update_account, update_avatar, update_cover_image,
    watch_history,
};
use crate::AppState;

pub fn user_router() -> Router<AppState> {
    Router::new()
        .route("/current-user", get(current_user))
        .route("/update-account", patch(update_account))
        .route("/avatar", patch(update_avatar))
        .route("/cover-image", patch(update_cover_image))
        .route("/channel/:username", get(channel_profile))
        .route("/history", get(watch_history))
        .route("/search", get(search_user))
}

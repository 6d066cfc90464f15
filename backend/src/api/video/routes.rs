//! Defines the HTTP routes for the video API.
//!
//! One canonical route per operation: upload behind the auth guard, and a
//! listing of the caller's own videos.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{list_videos, upload_video};
use crate::AppState;

pub fn video_router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_video))
        .route("/", get(list_videos))
}

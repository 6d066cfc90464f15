//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle user registration, login, logout, token refreshing,
//! and password changes. They are mounted under `/api/v1/users` by the main
//! Axum router.

use axum::routing::post;
use axum::Router;

use super::handlers::{
    change_current_password, login_user, logout_user, refresh_access_token, register_user,
};
use crate::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
        .route("/refresh-token", post(refresh_access_token))
        .route("/change-password", post(change_current_password))
}

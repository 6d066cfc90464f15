//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for user authentication
//! (registration, login, logout, token refresh, password change), parse
//! request data, validate input, and delegate the core business logic to
//! `auth::service`.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::auth::middleware::CurrentUser;
use crate::auth::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RefreshRequest, RegisterProfile, TokenPair,
    UserView,
};
use crate::errors::ApiError;
use crate::utils::{
    clear_session_cookies, session_cookies, text_field, ApiResponse, FilePart, REFRESH_COOKIE,
};
use crate::AppState;

#[derive(Default)]
struct RegisterForm {
    full_name: Option<String>,
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
    avatar: Option<FilePart>,
    cover_image: Option<FilePart>,
}

async fn collect_register_form(mut multipart: Multipart) -> Result<RegisterForm, ApiError> {
    let mut form = RegisterForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("invalid multipart payload: {err}")))?
    {
        match field.name() {
            Some("fullName") => form.full_name = Some(text_field(field).await?),
            Some("email") => form.email = Some(text_field(field).await?),
            Some("username") => form.username = Some(text_field(field).await?),
            Some("password") => form.password = Some(text_field(field).await?),
            Some("avatar") => form.avatar = Some(FilePart::from_field(field).await?),
            Some("coverImage") => form.cover_image = Some(FilePart::from_field(field).await?),
            _ => {}
        }
    }
    Ok(form)
}

/// POST /api/v1/users/register
pub async fn register_user(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>), ApiError> {
    let form = collect_register_form(multipart).await?;

    let full_name = form.full_name.unwrap_or_default();
    if full_name.trim().is_empty() {
        return Err(ApiError::bad_request("full name is required"));
    }
    let email = form.email.unwrap_or_default();
    let username = form.username.unwrap_or_default().to_lowercase();
    let password = form.password.unwrap_or_default();
    if [&email, &username, &password].iter().any(|field| field.trim().is_empty()) {
        return Err(ApiError::bad_request("all fields are required"));
    }
    let avatar = form
        .avatar
        .ok_or_else(|| ApiError::bad_request("avatar file is required"))?;

    // Reject duplicates before paying for uploads; the unique index still
    // backs the remaining race window.
    state.sessions.ensure_unclaimed(&username, &email).await?;

    let avatar_asset = state.media.upload(&avatar.filename, avatar.bytes).await?;
    let cover_url = match form.cover_image {
        Some(cover) => Some(state.media.upload(&cover.filename, cover.bytes).await?.url),
        None => None,
    };

    let view = state
        .sessions
        .register(RegisterProfile {
            full_name,
            email,
            username,
            password,
            avatar_url: avatar_asset.url,
            cover_image_url: cover_url,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(view, "user registered successfully")),
    ))
}

/// POST /api/v1/users/login
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    if request.username.is_none() && request.email.is_none() {
        return Err(ApiError::bad_request("username or email is required"));
    }

    let username = request.username.as_deref().map(str::to_lowercase);
    let (user, pair) = state
        .sessions
        .login(username.as_deref(), request.email.as_deref(), &request.password)
        .await?;

    let jar = session_cookies(jar, &pair);
    let response = LoginResponse {
        user,
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    };
    Ok((jar, Json(ApiResponse::ok(response, "user logged in successfully"))))
}

/// POST /api/v1/users/logout
pub async fn logout_user(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<Value>>), ApiError> {
    state.sessions.logout(&current.0.id).await?;
    let jar = clear_session_cookies(jar);
    Ok((jar, Json(ApiResponse::ok(json!({}), "user logged out"))))
}

/// POST /api/v1/users/refresh-token
///
/// The refresh token may arrive as a cookie or in the JSON body; the cookie
/// wins when both are present.
pub async fn refresh_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> Result<(CookieJar, Json<ApiResponse<TokenPair>>), ApiError> {
    let presented = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| body.and_then(|Json(request)| request.refresh_token));

    let pair = state.sessions.refresh(presented.as_deref()).await?;

    let jar = session_cookies(jar, &pair);
    Ok((jar, Json(ApiResponse::ok(pair, "access token refreshed"))))
}

/// POST /api/v1/users/change-password
pub async fn change_current_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state
        .sessions
        .change_password(&current.0.id, &request.old_password, &request.new_password)
        .await?;
    Ok(Json(ApiResponse::ok(json!({}), "password changed successfully")))
}

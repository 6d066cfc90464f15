//! Shared helpers for API responses, session cookie transport, and multipart
//! field handling.

use axum::extract::multipart::Field;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;

use crate::auth::models::TokenPair;
use crate::errors::ApiError;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Uniform success envelope returned by every endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self { status_code: 200, data, message: message.into(), success: true }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self { status_code: 201, data, message: message.into(), success: true }
    }
}

fn secure_cookie(name: &'static str, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    // Cookies are server-modifiable only and require TLS.
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_path("/");
    cookie
}

/// Attach both session tokens as httpOnly/secure cookies.
pub fn session_cookies(jar: CookieJar, pair: &TokenPair) -> CookieJar {
    jar.add(secure_cookie(ACCESS_COOKIE, pair.access_token.clone()))
        .add(secure_cookie(REFRESH_COOKIE, pair.refresh_token.clone()))
}

/// Expire both session cookies.
pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(secure_cookie(ACCESS_COOKIE, String::new()))
        .remove(secure_cookie(REFRESH_COOKIE, String::new()))
}

/// One uploaded file pulled out of a multipart request.
pub struct FilePart {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub async fn from_field(field: Field<'_>) -> Result<Self, ApiError> {
        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::bad_request(format!("invalid multipart payload: {err}")))?
            .to_vec();
        Ok(Self { filename, bytes })
    }
}

/// Read a text field, mapping decode failures to a 400.
pub async fn text_field(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|err| ApiError::bad_request(format!("invalid multipart payload: {err}")))
}

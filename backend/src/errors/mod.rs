//! Global application error types and handlers.
//!
//! This module defines the error taxonomy used across the entire backend and
//! maps each kind to a stable HTTP status and response envelope. Every
//! failure a handler can produce collapses into one of these kinds; nothing
//! is silently swallowed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::auth::errors::AuthError;

/// Client-facing error taxonomy. The `(kind, message)` pair is stable; the
/// message is diagnostic only and never distinguishes cases the kind
/// deliberately merges (e.g. the different `Unauthorized` causes).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }

        let body = json!({
            "statusCode": status.as_u16(),
            "success": false,
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownIdentity => ApiError::NotFound("user does not exist".to_string()),
            AuthError::BadCredentials
            | AuthError::MissingToken
            | AuthError::TokenRejected(_)
            | AuthError::StaleToken
            | AuthError::OrphanToken => ApiError::Unauthorized(err.to_string()),
            AuthError::DuplicateIdentity => {
                ApiError::Conflict("user with email or username already exists".to_string())
            }
            // Token minting and store failures surface as Internal without
            // leaking the underlying storage error message.
            AuthError::TokenGeneration | AuthError::Hashing => {
                ApiError::Internal("something went wrong while generating session tokens".to_string())
            }
            AuthError::Store(_) => ApiError::Internal("identity store failure".to_string()),
        }
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        tracing::error!(error = %err, "database operation failed");
        ApiError::Internal("database operation failed".to_string())
    }
}

impl From<media::MediaError> for ApiError {
    fn from(err: media::MediaError) -> Self {
        tracing::error!(error = %err, "media upload failed");
        ApiError::Internal("media upload failed".to_string())
    }
}

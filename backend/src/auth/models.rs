//! Data structures for authentication-related entities.
//!
//! This module defines the domain model for users, JWT claims, and the
//! request/response types used by the authentication flow. Database-side
//! document mappings live in `database::models`; these types are what the
//! session lifecycle and the API surface work with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered principal as the session lifecycle sees it.
///
/// `refresh_token` is the single valid slot: at most one refresh token per
/// user is honored at any time, and issuing a new one overwrites it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Sanitized view of a user, safe to return to clients. The password hash
/// and the stored refresh token are never part of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar: user.avatar,
            cover_image: user.cover_image,
            created_at: user.created_at,
        }
    }
}

/// Profile data for a registration, with media already uploaded. Password
/// arrives in the clear here and leaves as a hash.
#[derive(Debug, Clone)]
pub struct RegisterProfile {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}

/// Signed claims carried by both token kinds.
///
/// `jti` makes consecutive issuances distinct even within the same second,
/// which the rotation check relies on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Identity id (hex object id).
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Freshly minted access/refresh pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserView,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

//! Rust structs that represent database document mappings.
//!
//! These models define the structure of data as it is stored in and
//! retrieved from MongoDB. Field names follow the collection's camelCase
//! convention; note that these may differ from the API-facing models in
//! `auth::models`.

use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::auth::models::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Argon2 hash; the cleartext never reaches this struct.
    pub password: String,
    /// Single-slot refresh token. Absent means no active session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub watch_history: Vec<ObjectId>,
    pub created_at: DateTime,
}

impl UserDoc {
    pub fn into_domain(self) -> User {
        User {
            id: self.id.to_hex(),
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            avatar: self.avatar,
            cover_image: self.cover_image,
            password_hash: self.password,
            refresh_token: self.refresh_token,
            created_at: bson_to_chrono(self.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub video_file: String,
    /// Seconds, as reported by the media host.
    pub duration: f64,
    pub owner: ObjectId,
    pub created_at: DateTime,
}

/// API-facing shape of a video document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub video_file: String,
    pub duration: f64,
    pub owner: String,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<VideoDoc> for VideoView {
    fn from(doc: VideoDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            title: doc.title,
            description: doc.description,
            thumbnail: doc.thumbnail,
            video_file: doc.video_file,
            duration: doc.duration,
            owner: doc.owner.to_hex(),
            created_at: bson_to_chrono(doc.created_at),
        }
    }
}

fn bson_to_chrono(value: DateTime) -> ChronoDateTime<Utc> {
    ChronoDateTime::from_timestamp_millis(value.timestamp_millis())
        .unwrap_or(ChronoDateTime::<Utc>::UNIX_EPOCH)
}

//! Logic for assembling aggregated profile views.
//!
//! This module builds and runs the aggregation pipelines behind the channel
//! profile endpoint (subscriber counts joined in from the `subscriptions`
//! collection) and the watch history endpoint (videos joined with their
//! owners), keeping the raw pipeline shapes out of the API handlers.

use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::serialize_object_id_as_hex_string;
use mongodb::bson::{doc, from_document, Document};
use mongodb::Database;
use serde::{Deserialize, Serialize};

use crate::database::queries::{SUBSCRIPTIONS, USERS, VIDEOS};

/// A user seen as a channel, with subscription counts relative to the viewer.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub avatar: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub subscribers_count: i64,
    pub channels_subscribed_to_count: i64,
    pub is_subscribed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOwner {
    pub full_name: String,
    pub username: String,
    pub avatar: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub video_file: String,
    pub duration: f64,
    pub owner: HistoryOwner,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryDoc {
    #[serde(default)]
    watch_history: Vec<HistoryEntry>,
}

pub fn channel_pipeline(username: &str, viewer: ObjectId) -> Vec<Document> {
    vec![
        doc! { "$match": { "username": username.to_lowercase() } },
        doc! { "$lookup": {
            "from": SUBSCRIPTIONS,
            "localField": "_id",
            "foreignField": "channel",
            "as": "subscribers",
        } },
        doc! { "$lookup": {
            "from": SUBSCRIPTIONS,
            "localField": "_id",
            "foreignField": "subscriber",
            "as": "subscribedTo",
        } },
        doc! { "$addFields": {
            "subscribersCount": { "$size": "$subscribers" },
            "channelsSubscribedToCount": { "$size": "$subscribedTo" },
            "isSubscribed": {
                "$cond": {
                    "if": { "$in": [viewer, "$subscribers.subscriber"] },
                    "then": true,
                    "else": false,
                }
            },
        } },
        doc! { "$project": {
            "fullName": 1,
            "username": 1,
            "subscribersCount": 1,
            "channelsSubscribedToCount": 1,
            "isSubscribed": 1,
            "avatar": 1,
            "coverImage": 1,
            "email": 1,
        } },
    ]
}

pub fn watch_history_pipeline(user: ObjectId) -> Vec<Document> {
    vec![
        doc! { "$match": { "_id": user } },
        doc! { "$lookup": {
            "from": VIDEOS,
            "localField": "watchHistory",
            "foreignField": "_id",
            "as": "watchHistory",
            "pipeline": [
                { "$lookup": {
                    "from": USERS,
                    "localField": "owner",
                    "foreignField": "_id",
                    "as": "owner",
                    "pipeline": [
                        { "$project": { "fullName": 1, "username": 1, "avatar": 1 } },
                    ],
                } },
                { "$addFields": { "owner": { "$first": "$owner" } } },
            ],
        } },
        doc! { "$project": { "watchHistory": 1 } },
    ]
}

/// Channel view of `username` as seen by `viewer`. `None` when no such
/// channel exists.
pub async fn channel_profile(
    db: &Database,
    username: &str,
    viewer: ObjectId,
) -> Result<Option<ChannelProfile>, mongodb::error::Error> {
    let mut cursor = db
        .collection::<Document>(USERS)
        .aggregate(channel_pipeline(username, viewer), None)
        .await?;

    match cursor.try_next().await? {
        Some(document) => Ok(Some(from_document(document)?)),
        None => Ok(None),
    }
}

/// The viewer's watch history, newest data as stored, with each video's
/// owner resolved to a slim profile.
pub async fn watch_history(
    db: &Database,
    user: ObjectId,
) -> Result<Vec<HistoryEntry>, mongodb::error::Error> {
    let mut cursor = db
        .collection::<Document>(USERS)
        .aggregate(watch_history_pipeline(user), None)
        .await?;

    match cursor.try_next().await? {
        Some(document) => {
            let parsed: HistoryDoc = from_document(document)?;
            Ok(parsed.watch_history)
        }
        None => Ok(Vec::new()),
    }
}

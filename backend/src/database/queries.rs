//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct database operations, providing
//! reusable repositories for users and videos and abstracting the query
//! logic from higher-level services and API handlers. `UserRepo` also
//! implements the `IdentityStore` the session lifecycle depends on.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};

use crate::auth::errors::AuthError;
use crate::auth::models::{RegisterProfile, User};
use crate::auth::service::IdentityStore;
use crate::database::models::{UserDoc, VideoDoc};

pub const USERS: &str = "users";
pub const VIDEOS: &str = "videos";
pub const SUBSCRIPTIONS: &str = "subscriptions";

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == 11000
    )
}

#[derive(Clone)]
pub struct UserRepo {
    users: Collection<UserDoc>,
}

impl UserRepo {
    pub fn new(db: &Database) -> Self {
        Self { users: db.collection(USERS) }
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserDoc>, mongodb::error::Error> {
        self.users.find_one(doc! { "username": username }, None).await
    }

    /// Update the mutable account fields and return the new document.
    pub async fn update_account(
        &self,
        id: &ObjectId,
        full_name: &str,
        email: &str,
    ) -> Result<Option<UserDoc>, mongodb::error::Error> {
        self.find_and_set(id, doc! { "fullName": full_name, "email": email }).await
    }

    pub async fn set_avatar(
        &self,
        id: &ObjectId,
        url: &str,
    ) -> Result<Option<UserDoc>, mongodb::error::Error> {
        self.find_and_set(id, doc! { "avatar": url }).await
    }

    pub async fn set_cover_image(
        &self,
        id: &ObjectId,
        url: &str,
    ) -> Result<Option<UserDoc>, mongodb::error::Error> {
        self.find_and_set(id, doc! { "coverImage": url }).await
    }

    async fn find_and_set(
        &self,
        id: &ObjectId,
        fields: mongodb::bson::Document,
    ) -> Result<Option<UserDoc>, mongodb::error::Error> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.users
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields }, options)
            .await
    }
}

#[async_trait]
impl IdentityStore for UserRepo {
    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, AuthError> {
        let mut clauses = Vec::new();
        if let Some(username) = username {
            clauses.push(doc! { "username": username });
        }
        if let Some(email) = email {
            clauses.push(doc! { "email": email });
        }
        if clauses.is_empty() {
            return Ok(None);
        }

        let found = self
            .users
            .find_one(doc! { "$or": clauses }, None)
            .await
            .map_err(AuthError::store)?;
        Ok(found.map(UserDoc::into_domain))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AuthError> {
        // A malformed id can only come from a token we did not mint; treat
        // it as an unknown identity rather than a store failure.
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let found = self
            .users
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(AuthError::store)?;
        Ok(found.map(UserDoc::into_domain))
    }

    async fn update_refresh_token(&self, id: &str, token: Option<&str>) -> Result<(), AuthError> {
        let oid = ObjectId::parse_str(id).map_err(AuthError::store)?;
        // Single-document update is the store's atomic primitive; last write
        // wins on concurrent rotations.
        let update = match token {
            Some(token) => doc! { "$set": { "refreshToken": token } },
            None => doc! { "$unset": { "refreshToken": 1 } },
        };
        self.users
            .update_one(doc! { "_id": oid }, update, None)
            .await
            .map_err(AuthError::store)?;
        Ok(())
    }

    async fn create_identity(
        &self,
        profile: &RegisterProfile,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let document = UserDoc {
            id: ObjectId::new(),
            username: profile.username.to_lowercase(),
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
            avatar: profile.avatar_url.clone(),
            cover_image: profile.cover_image_url.clone(),
            password: password_hash.to_string(),
            refresh_token: None,
            watch_history: Vec::new(),
            created_at: DateTime::now(),
        };

        self.users.insert_one(&document, None).await.map_err(|err| {
            if is_duplicate_key(&err) {
                AuthError::DuplicateIdentity
            } else {
                AuthError::store(err)
            }
        })?;
        Ok(document.into_domain())
    }

    async fn update_password_hash(&self, id: &str, hash: &str) -> Result<(), AuthError> {
        let oid = ObjectId::parse_str(id).map_err(AuthError::store)?;
        self.users
            .update_one(doc! { "_id": oid }, doc! { "$set": { "password": hash } }, None)
            .await
            .map_err(AuthError::store)?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct VideoRepo {
    videos: Collection<VideoDoc>,
}

impl VideoRepo {
    pub fn new(db: &Database) -> Self {
        Self { videos: db.collection(VIDEOS) }
    }

    pub async fn insert(&self, video: &VideoDoc) -> Result<(), mongodb::error::Error> {
        self.videos.insert_one(video, None).await?;
        Ok(())
    }

    pub async fn list_by_owner(
        &self,
        owner: &ObjectId,
    ) -> Result<Vec<VideoDoc>, mongodb::error::Error> {
        self.videos
            .find(doc! { "owner": owner }, None)
            .await?
            .try_collect()
            .await
    }
}

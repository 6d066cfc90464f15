//! Shared test doubles for the authentication module.
//!
//! An in-memory `IdentityStore`, a recording `MediaHost` stub, and an
//! `AppState` builder wired with both, so service tests and router tests
//! run against the same fixtures without a database or an upload host.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use media::{MediaAsset, MediaError, MediaHost};
use uuid::Uuid;

use crate::auth::errors::AuthError;
use crate::auth::models::{RegisterProfile, User};
use crate::auth::service::{IdentityStore, SessionService, TokenIssuer};
use crate::config::TokenSettings;
use crate::database::queries::{UserRepo, VideoRepo};
use crate::AppState;

pub(crate) struct MemoryStore {
    users: Mutex<Vec<User>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self { users: Mutex::new(Vec::new()) }
    }

    pub(crate) fn stored_refresh_token(&self, id: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .and_then(|u| u.refresh_token.clone())
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| {
                username.is_some_and(|name| u.username == name)
                    || email.is_some_and(|mail| u.email == mail)
            })
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn update_refresh_token(&self, id: &str, token: Option<&str>) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.refresh_token = token.map(str::to_string);
        }
        Ok(())
    }

    async fn create_identity(
        &self,
        profile: &RegisterProfile,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let user = User {
            id: Uuid::new_v4().simple().to_string(),
            username: profile.username.clone(),
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
            avatar: profile.avatar_url.clone(),
            cover_image: profile.cover_image_url.clone(),
            password_hash: password_hash.to_string(),
            refresh_token: None,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update_password_hash(&self, id: &str, hash: &str) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.password_hash = hash.to_string();
        }
        Ok(())
    }
}

/// Records uploads and hands back deterministic asset URLs.
#[derive(Default)]
pub(crate) struct StubHost {
    pub(crate) uploads: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaHost for StubHost {
    async fn upload(&self, filename: &str, _bytes: Vec<u8>) -> Result<MediaAsset, MediaError> {
        self.uploads.lock().unwrap().push(filename.to_string());
        Ok(MediaAsset {
            url: format!("https://cdn.test/{filename}"),
            public_id: format!("test/{filename}"),
            duration: Some(4.0),
            resource_type: "image".to_string(),
        })
    }
}

pub(crate) fn settings(secret: &str, ttl: Duration) -> TokenSettings {
    TokenSettings { secret: secret.to_string(), ttl }
}

pub(crate) fn issuer() -> TokenIssuer {
    TokenIssuer::new(
        settings("access-test-secret", Duration::minutes(15)),
        settings("refresh-test-secret", Duration::days(10)),
    )
}

pub(crate) fn alice_profile() -> RegisterProfile {
    RegisterProfile {
        full_name: "Alice Example".to_string(),
        email: "alice@example.com".to_string(),
        username: "alice".to_string(),
        password: "correct horse".to_string(),
        avatar_url: "https://cdn.example/avatar.png".to_string(),
        cover_image_url: None,
    }
}

pub(crate) struct TestApp {
    pub(crate) state: AppState,
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) media: Arc<StubHost>,
}

/// Full `AppState` over the in-memory doubles. The Mongo client is lazy and
/// never contacted; the repos exist only to satisfy the state shape.
pub(crate) async fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let media = Arc::new(StubHost::default());
    let sessions = Arc::new(SessionService::new(store.clone(), issuer()));

    let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:27017")
        .await
        .unwrap();
    let db = client.database("vidstream-test");

    let state = AppState {
        sessions,
        users: UserRepo::new(&db),
        videos: VideoRepo::new(&db),
        media: media.clone(),
        db,
    };
    TestApp { state, store, media }
}

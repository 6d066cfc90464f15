//! Core business logic for the authentication system.
//!
//! This service handles password hashing, token issuance and validation, and
//! the session lifecycle: login (verify, issue, persist), refresh (validate,
//! rotate, persist) and logout (invalidate). It orchestrates interactions
//! between handlers and the identity store.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::errors::{classify_jwt_error, AuthError, TokenFault};
use crate::auth::models::{RegisterProfile, TokenClaims, TokenPair, User, UserView};
use crate::config::TokenSettings;

/// Hash a password with a fresh random salt (Argon2id).
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hashing)
}

/// Credential verifier: constant-time salted comparison against the stored
/// hash. Never errors on mismatch; an unparseable stored hash also just
/// fails verification. The caller decides whether a `false` means 401 — an
/// unknown identity is a different error and never reaches this function.
pub fn verify_password(identity: &User, supplied: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(&identity.password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(supplied.as_bytes(), &parsed)
        .is_ok()
}

/// Mints and verifies both token kinds. Each kind carries its own signing
/// secret and expiry window, fixed at startup.
pub struct TokenIssuer {
    access: TokenSettings,
    refresh: TokenSettings,
}

impl TokenIssuer {
    pub fn new(access: TokenSettings, refresh: TokenSettings) -> Self {
        Self { access, refresh }
    }

    pub fn issue_access(&self, identity_id: &str) -> Result<String, AuthError> {
        Self::issue(&self.access, identity_id)
    }

    pub fn issue_refresh(&self, identity_id: &str) -> Result<String, AuthError> {
        Self::issue(&self.refresh, identity_id)
    }

    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, TokenFault> {
        Self::verify(&self.access, token)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<TokenClaims, TokenFault> {
        Self::verify(&self.refresh, token)
    }

    fn issue(settings: &TokenSettings, identity_id: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: identity_id.to_string(),
            iat: now.timestamp(),
            exp: (now + settings.ttl).timestamp(),
            // Random jti keeps two tokens minted in the same second distinct.
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(settings.secret.as_bytes()),
        )
        .map_err(|_| AuthError::TokenGeneration)
    }

    fn verify(settings: &TokenSettings, token: &str) -> Result<TokenClaims, TokenFault> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(settings.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|err| classify_jwt_error(&err))
    }
}

/// Single-slot refresh-token persistence, as the lifecycle needs it.
///
/// Implementations write through the identity record; no locking beyond the
/// store's own single-document atomicity is expected (last write wins).
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, AuthError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AuthError>;

    /// `Some` overwrites the slot, `None` clears it.
    async fn update_refresh_token(&self, id: &str, token: Option<&str>) -> Result<(), AuthError>;

    async fn create_identity(
        &self,
        profile: &RegisterProfile,
        password_hash: &str,
    ) -> Result<User, AuthError>;

    async fn update_password_hash(&self, id: &str, hash: &str) -> Result<(), AuthError>;
}

/// Session lifecycle manager.
///
/// Per-identity session states: Anonymous -> Authenticated -> (Refreshed)* ->
/// LoggedOut. All store calls are the only suspension points; persistence
/// happens strictly after verification so a failed call leaves no partial
/// state behind.
pub struct SessionService {
    store: Arc<dyn IdentityStore>,
    tokens: TokenIssuer,
}

impl SessionService {
    pub fn new(store: Arc<dyn IdentityStore>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    /// Create a new identity. Fails `DuplicateIdentity` when the username or
    /// email is already claimed; the password is hashed before it ever
    /// reaches the store.
    pub async fn register(&self, profile: RegisterProfile) -> Result<UserView, AuthError> {
        self.ensure_unclaimed(&profile.username, &profile.email).await?;
        let hash = hash_password(&profile.password)?;
        let user = self.store.create_identity(&profile, &hash).await?;
        tracing::info!(user = %user.username, "registered new user");
        Ok(user.into())
    }

    /// Fails `DuplicateIdentity` if either the username or the email is taken.
    pub async fn ensure_unclaimed(&self, username: &str, email: &str) -> Result<(), AuthError> {
        match self
            .store
            .find_by_username_or_email(Some(username), Some(email))
            .await?
        {
            Some(_) => Err(AuthError::DuplicateIdentity),
            None => Ok(()),
        }
    }

    /// Anonymous -> Authenticated.
    ///
    /// Unknown identity and wrong password are distinct failures
    /// (`UnknownIdentity` vs `BadCredentials`); token persistence only runs
    /// after the password check succeeds.
    pub async fn login(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        password: &str,
    ) -> Result<(UserView, TokenPair), AuthError> {
        let user = self
            .store
            .find_by_username_or_email(username, email)
            .await?
            .ok_or(AuthError::UnknownIdentity)?;

        if !verify_password(&user, password) {
            return Err(AuthError::BadCredentials);
        }

        let pair = self.rotate(&user.id).await?;
        tracing::info!(user = %user.username, "login succeeded");
        Ok((user.into(), pair))
    }

    /// Authenticated -> Refreshed.
    ///
    /// The presented token must match the stored slot byte-for-byte; any
    /// other token, including a previously valid one, is rejected as stale.
    /// On success the slot is overwritten, permanently invalidating the
    /// presented token.
    ///
    /// Known limitation: two refresh calls racing on the same token may both
    /// pass the comparison before either write lands; the slot then holds
    /// whichever rotation wrote last. Strict serializability of concurrent
    /// refreshes is not guaranteed.
    pub async fn refresh(&self, presented: Option<&str>) -> Result<TokenPair, AuthError> {
        let presented = presented.ok_or(AuthError::MissingToken)?;

        let claims = self
            .tokens
            .verify_refresh(presented)
            .map_err(AuthError::TokenRejected)?;

        let user = self
            .store
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AuthError::OrphanToken)?;

        match user.refresh_token.as_deref() {
            Some(stored) if stored == presented => {}
            _ => {
                tracing::warn!(user = %user.username, "stale refresh token presented");
                return Err(AuthError::StaleToken);
            }
        }

        self.rotate(&user.id).await
    }

    /// Authenticated -> LoggedOut. Clears the slot; idempotent, so a second
    /// logout (or one with nothing stored) is not an error.
    pub async fn logout(&self, identity_id: &str) -> Result<(), AuthError> {
        self.store.update_refresh_token(identity_id, None).await
    }

    pub async fn change_password(
        &self,
        identity_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .store
            .find_by_id(identity_id)
            .await?
            .ok_or(AuthError::UnknownIdentity)?;

        if !verify_password(&user, old_password) {
            return Err(AuthError::BadCredentials);
        }

        let hash = hash_password(new_password)?;
        self.store.update_password_hash(&user.id, &hash).await
    }

    /// Validate an access token and load its identity. Used by the request
    /// guard; every failure collapses to an authentication failure upstream.
    pub async fn authenticate(&self, access_token: &str) -> Result<User, AuthError> {
        let claims = self
            .tokens
            .verify_access(access_token)
            .map_err(AuthError::TokenRejected)?;

        self.store
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AuthError::OrphanToken)
    }

    /// Issue a fresh pair and overwrite the stored slot. A failure anywhere
    /// in here is reported as token generation trouble; the underlying store
    /// error is logged but not surfaced to the client.
    async fn rotate(&self, identity_id: &str) -> Result<TokenPair, AuthError> {
        let access_token = self.tokens.issue_access(identity_id)?;
        let refresh_token = self.tokens.issue_refresh(identity_id)?;

        if let Err(err) = self
            .store
            .update_refresh_token(identity_id, Some(&refresh_token))
            .await
        {
            tracing::error!(error = %err, "failed to persist rotated refresh token");
            return Err(AuthError::TokenGeneration);
        }

        Ok(TokenPair { access_token, refresh_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::auth::testing::{alice_profile, issuer, settings, MemoryStore};

    async fn service_with_alice() -> (SessionService, Arc<MemoryStore>, String) {
        let store = Arc::new(MemoryStore::new());
        let service = SessionService::new(store.clone(), issuer());
        let view = service.register(alice_profile()).await.unwrap();
        (service, store, view.id)
    }

    #[tokio::test]
    async fn login_yields_tokens_that_verify_and_encode_the_identity() {
        let (service, _, id) = service_with_alice().await;

        let (view, pair) = service
            .login(Some("alice"), None, "correct horse")
            .await
            .unwrap();
        assert_eq!(view.id, id);

        let verifier = issuer();
        let access = verifier.verify_access(&pair.access_token).unwrap();
        let refresh = verifier.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(access.sub, id);
        assert_eq!(refresh.sub, id);
    }

    #[tokio::test]
    async fn login_by_email_works_too() {
        let (service, _, _) = service_with_alice().await;
        let result = service
            .login(None, Some("alice@example.com"), "correct horse")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn wrong_password_is_bad_credentials_never_not_found() {
        let (service, _, _) = service_with_alice().await;
        let err = service.login(Some("alice"), None, "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));
    }

    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let (service, _, _) = service_with_alice().await;
        let err = service.login(Some("bob"), None, "whatever").await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownIdentity));
    }

    #[tokio::test]
    async fn refresh_rotates_once_and_rejects_replay() {
        let (service, store, id) = service_with_alice().await;

        let (_, first) = service
            .login(Some("alice"), None, "correct horse")
            .await
            .unwrap();

        let second = service.refresh(Some(&first.refresh_token)).await.unwrap();
        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
        assert_eq!(
            store.stored_refresh_token(&id).as_deref(),
            Some(second.refresh_token.as_str())
        );

        // The rotated-away token is permanently dead, even though unexpired.
        let err = service.refresh(Some(&first.refresh_token)).await.unwrap_err();
        assert!(matches!(err, AuthError::StaleToken));

        // The current slot still works.
        assert!(service.refresh(Some(&second.refresh_token)).await.is_ok());
    }

    #[tokio::test]
    async fn logout_kills_the_outstanding_refresh_token() {
        let (service, _, id) = service_with_alice().await;
        let (_, pair) = service
            .login(Some("alice"), None, "correct horse")
            .await
            .unwrap();

        service.logout(&id).await.unwrap();

        let err = service.refresh(Some(&pair.refresh_token)).await.unwrap_err();
        assert!(matches!(err, AuthError::StaleToken));
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let (service, _, id) = service_with_alice().await;
        service.logout(&id).await.unwrap();
        service.logout(&id).await.unwrap();
    }

    #[tokio::test]
    async fn refresh_without_a_token_is_rejected() {
        let (service, _, _) = service_with_alice().await;
        let err = service.refresh(None).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[tokio::test]
    async fn garbage_refresh_token_is_a_malformed_fault() {
        let (service, _, _) = service_with_alice().await;
        let err = service.refresh(Some("not.a.token")).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenRejected(TokenFault::Malformed)));
    }

    #[tokio::test]
    async fn expired_refresh_token_is_an_expired_fault() {
        // Refresh TTL far enough in the past to clear validation leeway.
        let store = Arc::new(MemoryStore::new());
        let service = SessionService::new(
            store,
            TokenIssuer::new(
                settings("access-test-secret", Duration::minutes(15)),
                settings("refresh-test-secret", Duration::minutes(-10)),
            ),
        );
        service.register(alice_profile()).await.unwrap();

        let (_, pair) = service
            .login(Some("alice"), None, "correct horse")
            .await
            .unwrap();

        let err = service.refresh(Some(&pair.refresh_token)).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenRejected(TokenFault::Expired)));
    }

    #[tokio::test]
    async fn foreign_signature_is_a_signature_fault() {
        let (service, _, id) = service_with_alice().await;

        let forger = TokenIssuer::new(
            settings("access-test-secret", Duration::minutes(15)),
            settings("some-other-secret", Duration::days(10)),
        );
        let forged = forger.issue_refresh(&id).unwrap();

        let err = service.refresh(Some(&forged)).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenRejected(TokenFault::Signature)));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username_or_email() {
        let (service, _, _) = service_with_alice().await;

        let err = service.register(alice_profile()).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateIdentity));

        let mut same_email = alice_profile();
        same_email.username = "alice2".to_string();
        let err = service.register(same_email).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateIdentity));
    }

    #[tokio::test]
    async fn change_password_checks_the_old_one() {
        let (service, _, id) = service_with_alice().await;

        let err = service
            .change_password(&id, "wrong", "next password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));

        service
            .change_password(&id, "correct horse", "next password")
            .await
            .unwrap();

        assert!(service.login(Some("alice"), None, "correct horse").await.is_err());
        assert!(service.login(Some("alice"), None, "next password").await.is_ok());
    }

    #[test]
    fn password_hashes_are_salted_and_verify() {
        let first = hash_password("swordfish").unwrap();
        let second = hash_password("swordfish").unwrap();
        assert_ne!(first, second);

        let user = User {
            id: "u1".to_string(),
            username: "u".to_string(),
            email: "u@example.com".to_string(),
            full_name: "U".to_string(),
            avatar: String::new(),
            cover_image: None,
            password_hash: first,
            refresh_token: None,
            created_at: Utc::now(),
        };
        assert!(verify_password(&user, "swordfish"));
        assert!(!verify_password(&user, "tunafish"));
    }
}

//! Middleware for protecting authenticated routes.
//!
//! This module contains the request guard that validates the access token
//! (from the `accessToken` cookie or an `Authorization: Bearer` header),
//! loads the corresponding user, and rejects the request with a 401 on any
//! failure.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use mongodb::bson::oid::ObjectId;

use crate::auth::models::User;
use crate::errors::ApiError;
use crate::utils::ACCESS_COOKIE;
use crate::AppState;

/// The authenticated caller, extracted per request.
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// The caller's id as an `ObjectId`, for query use.
    pub fn object_id(&self) -> Result<ObjectId, ApiError> {
        ObjectId::parse_str(&self.0.id)
            .map_err(|_| ApiError::internal("corrupt user id on authenticated session"))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ACCESS_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .or_else(|| bearer_token(parts))
            .ok_or_else(|| ApiError::Unauthorized("unauthorized request".to_string()))?;

        let user = state.sessions.authenticate(&token).await?;
        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::CurrentUser;
    use crate::auth::testing::{alice_profile, test_app};
    use crate::utils::ACCESS_COOKIE;

    async fn whoami(current: CurrentUser) -> String {
        current.0.username
    }

    async fn guarded_app() -> (Router, String) {
        let app = test_app().await;
        app.state.sessions.register(alice_profile()).await.unwrap();
        let (_, pair) = app
            .state
            .sessions
            .login(Some("alice"), None, "correct horse")
            .await
            .unwrap();
        let router = Router::new().route("/whoami", get(whoami)).with_state(app.state);
        (router, pair.access_token)
    }

    fn get_whoami() -> axum::http::request::Builder {
        Request::builder().method("GET").uri("/whoami")
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn request_without_credentials_is_rejected() {
        let (router, _) = guarded_app().await;

        let response = router
            .oneshot(get_whoami().body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_rejected() {
        let (router, _) = guarded_app().await;

        let response = router
            .oneshot(
                get_whoami()
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bearer_token_authenticates_the_caller() {
        let (router, access_token) = guarded_app().await;

        let response = router
            .oneshot(
                get_whoami()
                    .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "alice");
    }

    #[tokio::test]
    async fn access_cookie_authenticates_the_caller() {
        let (router, access_token) = guarded_app().await;

        let response = router
            .oneshot(
                get_whoami()
                    .header(header::COOKIE, format!("{ACCESS_COOKIE}={access_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "alice");
    }
}

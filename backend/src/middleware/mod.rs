//! General-purpose middleware for the API.
//!
//! This module contains the reusable middleware layers (request tracing,
//! CORS) applied to the main Axum router.

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// Credentials require an explicit origin; without one configured the API
/// falls back to a permissive, credential-less policy.
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    match origin.and_then(|origin| origin.parse::<HeaderValue>().ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .allow_credentials(true),
        None => CorsLayer::permissive(),
    }
}

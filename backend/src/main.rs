//! Main entry point for the Vidstream backend.
//!
//! This file initializes tracing, loads configuration, connects to MongoDB,
//! and registers all API routes and middleware on the Axum server.
//! It orchestrates the application's startup and defines its overall structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod middleware;
mod services;
mod utils;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use media::cloudinary::CloudinaryConfig;
use media::{CloudinaryHost, MediaHost};
use tracing_subscriber::EnvFilter;

use crate::auth::service::{SessionService, TokenIssuer};
use crate::config::AppConfig;
use crate::database::queries::{UserRepo, VideoRepo};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    pub users: UserRepo,
    pub videos: VideoRepo,
    pub media: Arc<dyn MediaHost>,
    pub db: mongodb::Database,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "configuration error");
            std::process::exit(1);
        }
    };

    let db = match database::connect(&config).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "MongoDB connection failed");
            std::process::exit(1);
        }
    };

    let users = UserRepo::new(&db);
    let tokens = TokenIssuer::new(config.access_token.clone(), config.refresh_token.clone());
    let sessions = Arc::new(SessionService::new(Arc::new(users.clone()), tokens));
    let media_host: Arc<dyn MediaHost> = Arc::new(CloudinaryHost::new(CloudinaryConfig {
        cloud_name: config.media.cloud_name.clone(),
        api_key: config.media.api_key.clone(),
        api_secret: config.media.api_secret.clone(),
    }));

    let state = AppState {
        sessions,
        users,
        videos: VideoRepo::new(&db),
        media: media_host,
        db,
    };

    let app = app_router(&config, state);

    let addr = config.bind_addr;
    tracing::info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind server address");
    axum::serve(listener, app).await.expect("server error");
}

fn app_router(config: &AppConfig, state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest(
            "/api/v1/users",
            auth::routes::auth_router().merge(api::user::routes::user_router()),
        )
        .nest("/api/v1/videos", api::video::routes::video_router())
        .layer(middleware::trace_layer())
        .layer(middleware::cors_layer(config.cors_origin.as_deref()))
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Welcome to Vidstream!"
}

//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, token signing secrets with their expiry
//! windows, and media host credentials. Everything is read once at startup
//! and immutable afterwards.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Signing secret and lifetime for one token kind.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl: Duration,
}

/// Cloudinary account credentials.
#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Process-wide configuration, loaded once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub cors_origin: Option<String>,
    pub access_token: TokenSettings,
    pub refresh_token: TokenSettings,
    pub media: MediaSettings,
}

impl AppConfig {
    /// Read the full configuration from the environment.
    ///
    /// Access tokens live for minutes, refresh tokens for days; both windows
    /// are overridable but carry defaults matching the deployed service.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = parsed_or("PORT", 8000)?;

        Ok(Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            mongo_uri: required("MONGODB_URI")?,
            mongo_db: env::var("MONGODB_DB").unwrap_or_else(|_| "vidstream".to_string()),
            cors_origin: env::var("CORS_ORIGIN").ok(),
            access_token: TokenSettings {
                secret: required("ACCESS_TOKEN_SECRET")?,
                ttl: Duration::minutes(parsed_or("ACCESS_TOKEN_TTL_MINUTES", 15)?),
            },
            refresh_token: TokenSettings {
                secret: required("REFRESH_TOKEN_SECRET")?,
                ttl: Duration::days(parsed_or("REFRESH_TOKEN_TTL_DAYS", 10)?),
            },
            media: MediaSettings {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
            },
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid { name, value: raw.to_string() })
}

//! Cloudinary-specific implementation of the `MediaHost` trait.
//!
//! This file contains the complete concrete implementation for Cloudinary's
//! signed upload API, including request signing, the multipart upload call,
//! and conversion of Cloudinary's response into the generic `MediaAsset`
//! model.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::errors::MediaError;
use crate::models::MediaAsset;
use crate::MediaHost;

/// Credentials and connection details for one Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Media host backed by Cloudinary's upload API.
///
/// Uploads use `resource_type=auto` so a single endpoint serves avatars,
/// cover images, thumbnails and video files alike.
pub struct CloudinaryHost {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    resource_type: String,
    duration: Option<f64>,
}

/// Compute the Cloudinary request signature: the hex SHA-1 of the serialized
/// signed parameters with the API secret appended.
fn sign_params(serialized_params: &str, api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(serialized_params.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.config.cloud_name
        )
    }

    fn unix_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<MediaAsset, MediaError> {
        let timestamp = Self::unix_timestamp();
        // Only `timestamp` participates in the signature; `file`, `api_key`
        // and `resource_type` are excluded by Cloudinary's signing rules.
        let signature = sign_params(&format!("timestamp={timestamp}"), &self.config.api_secret);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_owned());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature);

        let response = self.http.post(self.upload_url()).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "cloudinary upload rejected");
            return Err(MediaError::Rejected { status: status.as_u16(), message });
        }

        let body = response.text().await?;
        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|err| MediaError::UnexpectedResponse(err.to_string()))?;

        tracing::debug!(public_id = %parsed.public_id, resource_type = %parsed.resource_type, "uploaded media asset");

        Ok(MediaAsset {
            url: parsed.secure_url,
            public_id: parsed.public_id,
            duration: parsed.duration,
            resource_type: parsed.resource_type,
        })
    }
}

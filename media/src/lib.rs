//! Core `media` crate for abstracting third-party media host interactions.
//!
//! This crate defines the `MediaHost` trait, which outlines generic upload
//! functionality for externally hosted media (images, video files), and
//! provides a central point for accessing concrete implementations
//! (currently Cloudinary).

pub mod cloudinary;
pub mod errors;
pub mod models;

use async_trait::async_trait;

pub use cloudinary::CloudinaryHost;
pub use errors::MediaError;
pub use models::MediaAsset;

/// Generic interface to an external media host.
///
/// The backend never stores media bytes itself; every upload is handed to an
/// implementation of this trait and only the resulting asset metadata (URL,
/// duration) is persisted.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload a file and return the hosted asset metadata.
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<MediaAsset, MediaError>;
}

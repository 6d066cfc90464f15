//! Generic data models for the `media` crate.
//!
//! These models define common, abstracted representations of hosted media
//! assets that can be returned by any host implementation, allowing the
//! backend to persist a consistent shape regardless of the provider.

use serde::{Deserialize, Serialize};

/// Metadata for a successfully uploaded asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Publicly reachable URL of the asset.
    pub url: String,
    /// Provider-side identifier, useful for later deletion.
    pub public_id: String,
    /// Duration in seconds. Present for video/audio, absent for images.
    pub duration: Option<f64>,
    /// Provider resource classification, e.g. "image" or "video".
    pub resource_type: String,
}

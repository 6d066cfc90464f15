//! Custom error types specific to the `media` crate.
//!
//! This module defines errors that can occur while talking to the external
//! media host, providing a unified error handling mechanism for all upload
//! interactions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    /// The HTTP request to the media host could not be completed.
    #[error("media host transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The media host answered with a non-success status.
    #[error("media host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The media host answered 2xx but the body did not match the expected
    /// upload response shape.
    #[error("unexpected response from media host: {0}")]
    UnexpectedResponse(String),
}

//! Module for the video API.
//!
//! This module defines the public interface for uploading videos to the
//! external media host and listing a user's uploads.

pub mod handlers;
pub mod routes;

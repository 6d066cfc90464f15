//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the different API domains
//! (user profiles, videos), excluding the core authentication routes which
//! live in `auth`.

pub mod user;
pub mod video;

//! Module for user profile and management API endpoints.
//!
//! This module handles functionalities related to user information that are
//! distinct from the core authentication process, such as profile updates,
//! channel views, watch history, and search.

pub mod handlers;
pub mod routes;

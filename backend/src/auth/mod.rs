//! Authentication module for managing user accounts, sessions, and access control.
//!
//! This module provides the public interface for user authentication-related
//! functionalities such as login, registration, token management, and the
//! request guard for protected routes.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use middleware::CurrentUser;
pub use models::{TokenPair, User, UserView};
pub use service::{IdentityStore, SessionService, TokenIssuer};

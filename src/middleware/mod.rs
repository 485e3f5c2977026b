//! Middleware module
//!
//! This module contains request processing layers and extractors

pub mod auth;
pub mod cors;
pub mod logging;

// Re-export commonly used middleware
pub use auth::AuthUser;
pub use cors::cors_layer;


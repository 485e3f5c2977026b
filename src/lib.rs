//! Secret-Santa assignment service
//!
//! Generates a random derangement of an event's active participants, so that
//! every participant gives exactly one gift and receives exactly one, never to
//! themselves. Exposes the generator over HTTP with admin-only access.

pub mod app;
pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, SecretSantaError};

// Re-export main components for easy access
pub use app::{create_router, AppState};
pub use database::{DatabaseService, ExchangeStore, InMemoryStore};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}

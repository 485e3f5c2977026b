//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{create_pool, health_check, run_migrations, DatabasePool};
pub use memory::InMemoryStore;
pub use repositories::{AssignmentRepository, EventRepository, ParticipantRepository};
pub use service::DatabaseService;
pub use store::ExchangeStore;

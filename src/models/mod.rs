//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod assignment;
pub mod event;
pub mod participant;

// Re-export commonly used models
pub use assignment::{Assignment, GenerationOutcome, Pairing};
pub use event::{Event, EventStatus};
pub use participant::Participant;

//! Error handling for the Secret-Santa service
//!
//! This module defines the main error type used throughout the application
//! and how each kind is surfaced to HTTP callers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::models::event::EventStatus;

/// Postgres SQLSTATE for unique constraint violations
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Main error type for the Secret-Santa service
#[derive(Error, Debug)]
pub enum SecretSantaError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication required: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: Uuid },

    #[error("Event must be open to generate assignments (current status: {status})")]
    InvalidState { status: EventStatus },

    #[error("At least {required} active participants are required to generate assignments (found {found})")]
    InsufficientParticipants { found: usize, required: usize },

    #[error("Assignments already exist for this event")]
    AlreadyAssigned,

    #[error("Failed to generate valid assignments after multiple attempts ({attempts} attempts)")]
    GenerationFailed { attempts: usize },

    #[error("Assignments for this event have not been revealed yet")]
    NotRevealed,

    #[error("No assignment found for user {user_id}")]
    AssignmentNotFound { user_id: Uuid },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Secret-Santa operations
pub type Result<T> = std::result::Result<T, SecretSantaError>;

impl From<config::ConfigError> for SecretSantaError {
    fn from(err: config::ConfigError) -> Self {
        SecretSantaError::Config(err.to_string())
    }
}

impl SecretSantaError {
    /// Map a batch-insert failure, turning a unique violation into `AlreadyAssigned`
    pub fn from_assignment_insert(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                return SecretSantaError::AlreadyAssigned;
            }
        }
        SecretSantaError::Database(err)
    }

    /// Check if the caller may retry the same request and expect a different outcome
    pub fn is_recoverable(&self) -> bool {
        match self {
            SecretSantaError::Database(_) => true,
            SecretSantaError::Migration(_) => false,
            SecretSantaError::Config(_) => false,
            SecretSantaError::Authentication(_) => false,
            SecretSantaError::PermissionDenied(_) => false,
            SecretSantaError::EventNotFound { .. } => false,
            SecretSantaError::InvalidState { .. } => false,
            SecretSantaError::InsufficientParticipants { .. } => true,
            SecretSantaError::AlreadyAssigned => false,
            SecretSantaError::GenerationFailed { .. } => true,
            SecretSantaError::NotRevealed => true,
            SecretSantaError::AssignmentNotFound { .. } => false,
            SecretSantaError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SecretSantaError::Database(_) => ErrorSeverity::Critical,
            SecretSantaError::Migration(_) => ErrorSeverity::Critical,
            SecretSantaError::Config(_) => ErrorSeverity::Critical,
            SecretSantaError::Authentication(_) => ErrorSeverity::Warning,
            SecretSantaError::PermissionDenied(_) => ErrorSeverity::Warning,
            SecretSantaError::GenerationFailed { .. } => ErrorSeverity::Error,
            _ => ErrorSeverity::Info,
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SecretSantaError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SecretSantaError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            SecretSantaError::EventNotFound { .. }
            | SecretSantaError::InvalidState { .. }
            | SecretSantaError::InsufficientParticipants { .. }
            | SecretSantaError::AlreadyAssigned
            | SecretSantaError::GenerationFailed { .. }
            | SecretSantaError::NotRevealed
            | SecretSantaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SecretSantaError::AssignmentNotFound { .. } => StatusCode::NOT_FOUND,
            SecretSantaError::Database(_)
            | SecretSantaError::Migration(_)
            | SecretSantaError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SecretSantaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, severity = %self.severity(), "Request failed with internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_failures_are_bad_requests() {
        assert_eq!(SecretSantaError::AlreadyAssigned.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            SecretSantaError::InvalidState { status: EventStatus::Draft }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SecretSantaError::GenerationFailed { attempts: 100 }.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_auth_failures_are_distinguishable() {
        assert_eq!(
            SecretSantaError::Authentication("missing token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SecretSantaError::PermissionDenied("admin role required".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_already_assigned_message() {
        assert_eq!(
            SecretSantaError::AlreadyAssigned.to_string(),
            "Assignments already exist for this event"
        );
    }

    #[test]
    fn test_non_database_insert_error_is_passed_through() {
        let err = SecretSantaError::from_assignment_insert(sqlx::Error::RowNotFound);
        assert!(matches!(err, SecretSantaError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_infrastructure_failures_are_internal() {
        assert_eq!(
            SecretSantaError::Database(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SecretSantaError::Config("missing secret".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(SecretSantaError::Database(sqlx::Error::PoolClosed).is_recoverable());
    }

    #[test]
    fn test_recoverability() {
        assert!(!SecretSantaError::AlreadyAssigned.is_recoverable());
        assert!(SecretSantaError::GenerationFailed { attempts: 100 }.is_recoverable());
        assert_eq!(
            SecretSantaError::Config("x".into()).severity(),
            ErrorSeverity::Critical
        );
    }
}

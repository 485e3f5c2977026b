//! Services module
//!
//! This module contains business logic services

pub mod assignment;
pub mod auth;
pub mod derangement;
pub mod event_lock;

// Re-export commonly used services
pub use assignment::AssignmentService;
pub use auth::{AuthContext, AuthService, Permission};
pub use event_lock::{EventLockGuard, EventLocks};

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::database::ExchangeStore;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub assignment_service: AssignmentService,
    pub auth_service: AuthService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, store: Arc<dyn ExchangeStore>) -> Self {
        Self {
            assignment_service: AssignmentService::new(store, settings.exchange.clone()),
            auth_service: AuthService::new(settings.auth.clone()),
        }
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let store_healthy = match self.assignment_service.store().health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Store health check failed");
                false
            }
        };

        ServiceHealthStatus { store_healthy }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub store_healthy: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.store_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.store_healthy {
            issues.push("Store connection failed".to_string());
        }

        issues
    }
}

//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, SecretSantaError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_exchange_config(&settings.exchange)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(SecretSantaError::Config("Server host is required".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(SecretSantaError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(SecretSantaError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(SecretSantaError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate bearer credential configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.is_empty() {
        return Err(SecretSantaError::Config("JWT secret is required".to_string()));
    }

    if config.admin_role.is_empty() {
        return Err(SecretSantaError::Config("Admin role name is required".to_string()));
    }

    Ok(())
}

/// Validate assignment generation policy
fn validate_exchange_config(config: &super::ExchangeConfig) -> Result<()> {
    // a derangement of fewer than two elements does not exist
    if config.min_participants < 2 {
        return Err(SecretSantaError::Config(
            "Minimum participants must be at least 2".to_string(),
        ));
    }

    if config.max_attempts == 0 {
        return Err(SecretSantaError::Config(
            "Max generation attempts must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SecretSantaError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SecretSantaError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub exchange: ExchangeConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Bearer credential configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default)]
    pub audience: Option<String>,
    pub admin_role: String,
    #[serde(default)]
    pub admin_user_ids: Vec<Uuid>,
}

/// Assignment generation policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    /// Smallest active participant count accepted for generation
    pub min_participants: usize,
    /// Shuffle attempts before giving up on finding a derangement
    pub max_attempts: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub json: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();

        let settings = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections as i64)?
            .set_default("database.min_connections", defaults.database.min_connections as i64)?
            .set_default("database.acquire_timeout_seconds", defaults.database.acquire_timeout_seconds as i64)?
            .set_default("auth.jwt_secret", defaults.auth.jwt_secret)?
            .set_default("auth.admin_role", defaults.auth.admin_role)?
            .set_default("exchange.min_participants", defaults.exchange.min_participants as i64)?
            .set_default("exchange.max_attempts", defaults.exchange.max_attempts as i64)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.file_path", defaults.logging.file_path)?
            .set_default("logging.json", defaults.logging.json)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("SECRET_SANTA")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.admin_user_ids")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::SecretSantaError> {
        super::validation::validate_settings(self)
    }

    /// Socket address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/secret_santa".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: 30,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                audience: None,
                admin_role: "admin".to_string(),
                admin_user_ids: vec![],
            },
            exchange: ExchangeConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "./logs".to_string(),
                json: true,
            },
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            min_participants: crate::services::derangement::DEFAULT_MIN_PARTICIPANTS,
            max_attempts: crate::services::derangement::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

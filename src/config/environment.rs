// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! Environment-based configuration management for production deployment

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use super::database::DatabaseUrl;
use crate::constants::{pagination, ports};
use crate::errors::{AppError, AppResult};

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development: generated secrets are acceptable
    #[default]
    Development,
    /// Production: every secret must be configured
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection target
    pub url: DatabaseUrl,
    /// Maximum pool connections for file databases
    pub max_connections: u32,
}

/// Token authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret shared with the identity service
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    /// Lifetime of tokens minted by the admin tool
    pub jwt_expiry_hours: i64,
}

/// Cross-origin settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated origin list or `*`
    pub allowed_origins: String,
}

/// List endpoint page sizes
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size when the client omits `limit`
    pub default_page_size: u32,
    /// Upper bound on `limit`
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: pagination::DEFAULT_PAGE_SIZE,
            max_page_size: pagination::MAX_PAGE_SIZE,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// HTTP listen host
    pub host: String,
    /// Deployment mode
    pub environment: Environment,
    /// Database settings
    pub database: DatabaseConfig,
    /// Token authentication settings
    pub auth: AuthConfig,
    /// Cross-origin settings
    pub cors: CorsConfig,
    /// List endpoint page sizes
    pub pagination: PaginationConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed, or if a
    /// production deployment lacks `JWT_SECRET`
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));

        let config = Self {
            http_port: parse_env("HTTP_PORT", ports::DEFAULT_HTTP_PORT)?,
            host: env_var_or("HOST", "127.0.0.1"),
            environment,
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", "sqlite:./data/pantry.db"))?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5)?,
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
                jwt_expiry_hours: parse_env("JWT_EXPIRY_HOURS", 24)?,
            },
            cors: CorsConfig {
                allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
            },
            pagination: PaginationConfig {
                default_page_size: parse_env("DEFAULT_PAGE_SIZE", pagination::DEFAULT_PAGE_SIZE)?,
                max_page_size: parse_env("MAX_PAGE_SIZE", pagination::MAX_PAGE_SIZE)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error when a production deployment has no JWT secret or the
    /// pagination bounds are inconsistent
    pub fn validate(&self) -> AppResult<()> {
        if self.auth.jwt_secret.is_none() {
            if self.environment.is_production() {
                return Err(AppError::config(
                    "JWT_SECRET must be set when ENVIRONMENT=production",
                ));
            }
            warn!("JWT_SECRET not set; a random secret will be generated for this process");
        }

        if self.auth.jwt_expiry_hours <= 0 {
            return Err(AppError::config_invalid("JWT_EXPIRY_HOURS must be positive"));
        }

        if self.pagination.default_page_size == 0
            || self.pagination.default_page_size > self.pagination.max_page_size
        {
            return Err(AppError::config_invalid(format!(
                "DEFAULT_PAGE_SIZE ({}) must be between 1 and MAX_PAGE_SIZE ({})",
                self.pagination.default_page_size, self.pagination.max_page_size
            )));
        }

        Ok(())
    }

    /// Configuration for tests: in-memory database and a fixed secret
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            http_port: 0,
            host: "127.0.0.1".into(),
            environment: Environment::Testing,
            database: DatabaseConfig {
                url: DatabaseUrl::Memory,
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: Some("test-secret-with-enough-entropy-for-hs256".into()),
                jwt_expiry_hours: 24,
            },
            cors: CorsConfig {
                allowed_origins: "*".into(),
            },
            pagination: PaginationConfig::default(),
        }
    }

    /// Get a summary of the configuration for logging (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Pantry Server Configuration:\n\
             - Environment: {}\n\
             - HTTP: {}:{}\n\
             - Database: {}\n\
             - JWT Secret: {}\n\
             - JWT Expiry: {}h\n\
             - CORS Origins: {}\n\
             - Page Size: {} (max {})",
            self.environment,
            self.host,
            self.http_port,
            self.database.url,
            if self.auth.jwt_secret.is_some() {
                "Configured"
            } else {
                "Generated"
            },
            self.auth.jwt_expiry_hours,
            self.cors.allowed_origins,
            self.pagination.default_page_size,
            self.pagination.max_page_size,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config_invalid(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

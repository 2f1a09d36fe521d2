// ABOUTME: Configuration module organization
// ABOUTME: Environment-only configuration for server, database, auth, CORS, and pagination

//! Configuration management
//!
//! All settings come from environment variables; there is no configuration file.

/// Database URL parsing and connection settings
pub mod database;
/// Environment-based server configuration
pub mod environment;

pub use database::DatabaseUrl;
pub use environment::{
    AuthConfig, CorsConfig, DatabaseConfig, Environment, PaginationConfig, ServerConfig,
};

// ABOUTME: Main library entry point for the Pantry recipe sharing API
// ABOUTME: Recipes with tagged ingredients, favorites, subscriptions, and aggregated shopping lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

#![deny(unsafe_code)]

//! # Pantry Server
//!
//! A REST backend for sharing recipes. Users publish recipes composed of
//! tagged ingredients with amounts, follow other authors, keep favorites,
//! and collect recipes in a shopping cart that can be downloaded as a single
//! aggregated shopping list.
//!
//! ## Architecture
//!
//! - **database**: `SQLite` schema and per-table managers
//! - **services**: the composite recipe writer and the shopping list aggregator
//! - **routes**: axum handlers, one `*Routes` struct per resource
//! - **formatters**: shopping list document renderers
//! - **auth** / **permissions**: bearer token verification and modify rights
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pantry_server::auth::AuthManager;
//! use pantry_server::config::ServerConfig;
//! use pantry_server::database::Database;
//! use pantry_server::server::{run, ServerResources};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::new(&config.database.url, config.database.max_connections).await?;
//!     let auth_manager = AuthManager::from_config(&config.auth)?;
//!     let resources = Arc::new(ServerResources::new(database, auth_manager, Arc::new(config)));
//!     run(resources).await
//! }
//! ```

/// Bearer token issuing and verification
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` persistence
pub mod database;

/// Error types
pub mod errors;

/// Shopping list renderers
pub mod formatters;

/// Tracing subscriber setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Permission predicates
pub mod permissions;

/// HTTP routes
pub mod routes;

/// Router assembly and serve loop
pub mod server;

/// Composite recipe writer and shopping list aggregation
pub mod services;

pub use pantry_core::{models, pagination};

// ABOUTME: Server binary for the Pantry recipe sharing API
// ABOUTME: Loads configuration, initializes logging and the database, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! # Pantry Server Binary
//!
//! Starts the recipe API with bearer token authentication and `SQLite` storage.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pantry_server::{
    auth::AuthManager,
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    logging,
    server::{self, ServerResources},
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pantry-server")]
#[command(about = "Pantry - recipe sharing REST API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (e.g. `sqlite:./data/pantry.db`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }

    logging::init_from_env()?;

    info!("Starting Pantry server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url, config.database.max_connections).await?;
    let auth_manager = AuthManager::from_config(&config.auth)?;
    info!("Authentication manager initialized");

    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    ));

    if let Err(e) = server::run(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}

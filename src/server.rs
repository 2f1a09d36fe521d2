// ABOUTME: HTTP server assembly: shared resources, router composition, middleware stack, and serve loop
// ABOUTME: Routes for users, tags, ingredients, recipes, and health are merged into one axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::formatters::{PlainTextRenderer, ShoppingListRenderer};
use crate::middleware::{create_request_span, request_id_middleware, setup_cors};
use crate::routes::{HealthRoutes, IngredientRoutes, RecipeRoutes, TagRoutes, UserRoutes};

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state handed to every route handler
pub struct ServerResources {
    /// Database handle
    pub database: Database,
    /// Token verifier
    pub auth_manager: AuthManager,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Shopping list document renderer
    pub renderer: Arc<dyn ShoppingListRenderer>,
}

impl ServerResources {
    /// Bundle resources with the plain-text shopping list renderer
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        Self {
            database,
            auth_manager,
            config,
            renderer: Arc::new(PlainTextRenderer),
        }
    }

    /// Swap the shopping list renderer
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn ShoppingListRenderer>) -> Self {
        self.renderer = renderer;
        self
    }
}

/// Build the full application router with its middleware stack
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(UserRoutes::routes(Arc::clone(resources)))
        .merge(TagRoutes::routes(Arc::clone(resources)))
        .merge(IngredientRoutes::routes(Arc::clone(resources)))
        .merge(RecipeRoutes::routes(Arc::clone(resources)))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(create_request_span))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(setup_cors(&resources.config))
}

/// Bind the configured address and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", resources.config.host, resources.config.http_port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                resources.config.host, resources.config.http_port
            )
        })?;

    let router = build_router(&resources);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Pantry server listening on http://{addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Pantry server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// ABOUTME: Read-only tag endpoints
// ABOUTME: Lists all tags and fetches a single tag by id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::parse_id;
use crate::errors::AppError;
use crate::server::ServerResources;

/// Tag routes
pub struct TagRoutes;

impl TagRoutes {
    /// Create all tag routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/tags", get(Self::handle_list))
            .route("/api/tags/:id", get(Self::handle_get))
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let tags = resources.database.tags().list().await?;
        Ok((StatusCode::OK, Json(tags)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id = parse_id(&id, "Tag")?;
        let tag = resources
            .database
            .tags()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Tag"))?;
        Ok((StatusCode::OK, Json(tag)).into_response())
    }
}

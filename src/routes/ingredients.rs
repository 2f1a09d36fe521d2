// ABOUTME: Read-only ingredient endpoints with name search
// ABOUTME: GET /api/ingredients?name= filters by a case-insensitive substring of the name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::parse_id;
use crate::errors::AppError;
use crate::server::ServerResources;

/// Query parameters for the ingredient list
#[derive(Debug, Default, Deserialize)]
pub struct IngredientSearch {
    /// Substring of the ingredient name
    pub name: Option<String>,
}

/// Ingredient routes
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients", get(Self::handle_list))
            .route("/api/ingredients/:id", get(Self::handle_get))
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(search): Query<IngredientSearch>,
    ) -> Result<Response, AppError> {
        let ingredients = resources
            .database
            .ingredients()
            .list(search.name.as_deref())
            .await?;
        Ok((StatusCode::OK, Json(ingredients)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id = parse_id(&id, "Ingredient")?;
        let ingredient = resources
            .database
            .ingredients()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient"))?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }
}

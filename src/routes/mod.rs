// ABOUTME: HTTP route modules for the recipe API and shared request helpers
// ABOUTME: Authentication, id parsing, and response views reused across route modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! Route modules
//!
//! Each `*Routes` struct builds a router with its state already applied, so
//! the server can merge them directly. Handlers authenticate explicitly and
//! pass the current user down as a value.

/// Health check endpoint
pub mod health;
/// Ingredient reference data
pub mod ingredients;
/// Recipes, favorites, shopping cart, and shopping list download
pub mod recipes;
/// Tag reference data
pub mod tags;
/// Users and subscriptions
pub mod users;

pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;
pub use tags::TagRoutes;
pub use users::UserRoutes;

use std::sync::Arc;

use axum::http::HeaderMap;
use pantry_core::models::User;
use uuid::Uuid;

use crate::auth::bearer_token;
use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;

/// Authenticate the request and load the current user
///
/// # Errors
///
/// Returns `AUTH_REQUIRED` without a token, or `AUTH_INVALID`/`AUTH_EXPIRED`
/// when the token is rejected or names a user that no longer exists
pub async fn authenticate(headers: &HeaderMap, resources: &Arc<ServerResources>) -> AppResult<User> {
    authenticate_optional(headers, resources)
        .await?
        .ok_or_else(AppError::auth_required)
}

/// Authenticate when a token is present; anonymous requests yield `None`
///
/// # Errors
///
/// Returns an error when a token is present but invalid
pub async fn authenticate_optional(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> AppResult<Option<User>> {
    let Some(token) = bearer_token(headers)? else {
        return Ok(None);
    };

    let claims = resources.auth_manager.validate_token(token)?;
    let user_id = claims.user_id()?;

    resources
        .database
        .users()
        .get(user_id)
        .await?
        .map(Some)
        .ok_or_else(|| AppError::auth_invalid("Token refers to an unknown user"))
}

/// Parse a path identifier; malformed ids are reported as a missing resource
///
/// # Errors
///
/// Returns `RESOURCE_NOT_FOUND` naming `resource` when `raw` is not a UUID
pub fn parse_id(raw: &str, resource: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(resource))
}

/// Interpret a boolean query flag (`1`, `true`, `yes`)
#[must_use]
pub fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

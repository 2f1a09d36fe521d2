// ABOUTME: Permission predicates for recipe and account operations
// ABOUTME: Safe methods are public; modifying a recipe requires its author or an admin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use pantry_core::models::{Recipe, User};

use crate::errors::{AppError, AppResult};

/// Whether `user` may change or delete `recipe`
#[must_use]
pub fn can_modify_recipe(user: &User, recipe: &Recipe) -> bool {
    user.is_admin || recipe.author.id == user.id
}

/// Require that `user` may change or delete `recipe`
///
/// # Errors
///
/// Returns `PERMISSION_DENIED` when the user is neither the author nor an admin
pub fn ensure_can_modify_recipe(user: &User, recipe: &Recipe) -> AppResult<()> {
    if can_modify_recipe(user, recipe) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %user.id,
            recipe_id = %recipe.id,
            "Rejected modification of another author's recipe"
        );
        Err(AppError::permission_denied(
            "Only the author can modify this recipe",
        ))
    }
}

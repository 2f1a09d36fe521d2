// ABOUTME: Favorites and shopping cart memberships between users and recipes
// ABOUTME: Add/remove report AlreadyExists/NotFound instead of failing, and the cart feeds the shopping list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::collections::HashSet;

use chrono::Utc;
use pantry_core::models::{AddOutcome, RecipeCollection, RecipeSummary, RemoveOutcome, ShoppingLine};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::recipes::row_to_summary;
use super::{column_to_u32, format_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};

/// Manager for the favorites and shopping cart relations
pub struct MembershipsManager {
    pool: SqlitePool,
}

impl MembershipsManager {
    /// Create a new memberships manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a recipe to a user's collection
    ///
    /// Returns the recipe's short view when the entry was created, or
    /// `AlreadyExists` when it was already present. Concurrent adds are settled
    /// by the primary key: exactly one inserts a row.
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the recipe does not exist, or a database error
    pub async fn add(
        &self,
        collection: RecipeCollection,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> AppResult<AddOutcome<RecipeSummary>> {
        let summary = self.recipe_summary(recipe_id).await?;

        let result = sqlx::query(&format!(
            r"
            INSERT INTO {} (user_id, recipe_id, created_at) VALUES ($1, $2, $3)
            ON CONFLICT (user_id, recipe_id) DO NOTHING
            ",
            collection.table()
        ))
        .bind(user_id.to_string())
        .bind(recipe_id.to_string())
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!(
                "Failed to add recipe to {}: {e}",
                collection.display_name()
            ))
        })?;

        if result.rows_affected() == 0 {
            return Ok(AddOutcome::AlreadyExists);
        }

        info!(
            user_id = %user_id,
            recipe_id = %recipe_id,
            collection = collection.table(),
            "Recipe added to collection"
        );
        Ok(AddOutcome::Created(summary))
    }

    /// Remove a recipe from a user's collection
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the recipe does not exist, or a database error
    pub async fn remove(
        &self,
        collection: RecipeCollection,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> AppResult<RemoveOutcome> {
        self.recipe_summary(recipe_id).await?;

        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            collection.table()
        ))
        .bind(user_id.to_string())
        .bind(recipe_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!(
                "Failed to remove recipe from {}: {e}",
                collection.display_name()
            ))
        })?;

        if result.rows_affected() == 0 {
            return Ok(RemoveOutcome::NotFound);
        }

        info!(
            user_id = %user_id,
            recipe_id = %recipe_id,
            collection = collection.table(),
            "Recipe removed from collection"
        );
        Ok(RemoveOutcome::Removed)
    }

    /// Check whether a recipe is in a user's collection
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn contains(
        &self,
        collection: RecipeCollection,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT 1 FROM {} WHERE user_id = $1 AND recipe_id = $2",
            collection.table()
        ))
        .bind(user_id.to_string())
        .bind(recipe_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check membership: {e}")))?;
        Ok(found.is_some())
    }

    /// Of the given recipes, return those in a user's collection
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn members_among(
        &self,
        collection: RecipeCollection,
        user_id: Uuid,
        recipe_ids: &[Uuid],
    ) -> AppResult<HashSet<Uuid>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT recipe_id FROM {} WHERE user_id = ",
            collection.table()
        ));
        query.push_bind(user_id.to_string()).push(" AND recipe_id IN (");
        let mut separated = query.separated(", ");
        for id in recipe_ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let found: Vec<String> = query
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load memberships: {e}")))?;

        found.iter().map(|id| parse_uuid(id)).collect()
    }

    /// Every ingredient line of every recipe in the user's shopping cart
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn cart_lines(&self, user_id: Uuid) -> AppResult<Vec<ShoppingLine>> {
        let rows = sqlx::query(
            r"
            SELECT i.name, i.measurement_unit, ri.amount
            FROM shopping_cart c
            JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE c.user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load shopping cart: {e}")))?;

        rows.iter()
            .map(|row| {
                let amount: i64 = row.get("amount");
                Ok(ShoppingLine::new(
                    row.get::<String, _>("name"),
                    row.get::<String, _>("measurement_unit"),
                    column_to_u32(amount, "amount")?,
                ))
            })
            .collect()
    }

    async fn recipe_summary(&self, recipe_id: Uuid) -> AppResult<RecipeSummary> {
        let row = sqlx::query("SELECT id, name, cooking_time FROM recipes WHERE id = $1")
            .bind(recipe_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?
            .ok_or_else(|| AppError::not_found("Recipe"))?;
        row_to_summary(&row)
    }
}

// ABOUTME: Ingredient reference data identified by (name, measurement unit)
// ABOUTME: Supports creation, lookup, batch lookup for recipe validation, and name search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::collections::HashMap;

use pantry_core::constants::limits::{INGREDIENT_NAME_MAX_LEN, MEASUREMENT_UNIT_MAX_LEN};
use pantry_core::models::{Ingredient, NewIngredient};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::parse_uuid;
use crate::errors::{AppError, AppResult, FieldIssue};

/// Manager for the ingredients table
pub struct IngredientsManager {
    pool: SqlitePool,
}

impl IngredientsManager {
    /// Create a new ingredients manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an ingredient
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank or oversized fields,
    /// `RESOURCE_ALREADY_EXISTS` if the (name, unit) pair exists, or a database error
    pub async fn create(&self, new_ingredient: &NewIngredient) -> AppResult<Ingredient> {
        let issues = validate_new_ingredient(new_ingredient);
        if !issues.is_empty() {
            return Err(AppError::validation(issues));
        }

        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            name: new_ingredient.name.trim().to_owned(),
            measurement_unit: new_ingredient.measurement_unit.trim().to_owned(),
        };

        sqlx::query("INSERT INTO ingredients (id, name, measurement_unit) VALUES ($1, $2, $3)")
            .bind(ingredient.id.to_string())
            .bind(&ingredient.name)
            .bind(&ingredient.measurement_unit)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::already_exists(format!(
                        "Ingredient '{}' measured in '{}' already exists",
                        ingredient.name, ingredient.measurement_unit
                    ))
                }
                other => AppError::database(format!("Failed to create ingredient: {other}")),
            })?;

        info!(ingredient_id = %ingredient.id, name = %ingredient.name, "Ingredient created");
        Ok(ingredient)
    }

    /// Get an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        row.as_ref().map(row_to_ingredient).transpose()
    }

    /// List ingredients ordered by name, optionally filtered by a
    /// case-insensitive substring of the name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self, name_filter: Option<&str>) -> AppResult<Vec<Ingredient>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT id, name, measurement_unit FROM ingredients");

        if let Some(filter) = name_filter.map(str::trim).filter(|f| !f.is_empty()) {
            query
                .push(" WHERE name LIKE ")
                .push_bind(format!("%{}%", escape_like(filter)))
                .push(" ESCAPE '\\'");
        }
        query.push(" ORDER BY name, measurement_unit");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        rows.iter().map(row_to_ingredient).collect()
    }

    /// Load the ingredients with the given ids on an existing connection
    ///
    /// Unknown ids are simply absent from the map.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_many(
        conn: &mut SqliteConnection,
        ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Ingredient>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT id, name, measurement_unit FROM ingredients WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let rows = query
            .build()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to load ingredients: {e}")))?;

        rows.iter()
            .map(|row| row_to_ingredient(row).map(|i| (i.id, i)))
            .collect()
    }
}

fn validate_new_ingredient(new_ingredient: &NewIngredient) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    let name = new_ingredient.name.trim();
    if name.is_empty() || name.chars().count() > INGREDIENT_NAME_MAX_LEN {
        issues.push(FieldIssue::new(
            "name",
            format!("Name must be between 1 and {INGREDIENT_NAME_MAX_LEN} characters"),
        ));
    }
    let unit = new_ingredient.measurement_unit.trim();
    if unit.is_empty() || unit.chars().count() > MEASUREMENT_UNIT_MAX_LEN {
        issues.push(FieldIssue::new(
            "measurement_unit",
            format!("Measurement unit must be between 1 and {MEASUREMENT_UNIT_MAX_LEN} characters"),
        ));
    }
    issues
}

/// Escape `LIKE` wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    let id: String = row.get("id");
    Ok(Ingredient {
        id: parse_uuid(&id)?,
        name: row.get("name"),
        measurement_unit: row.get("measurement_unit"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("flour"), "flour");
    }

    #[test]
    fn test_blank_ingredient_rejected() {
        let issues = validate_new_ingredient(&NewIngredient {
            name: " ".into(),
            measurement_unit: "g".into(),
        });
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "name");
    }
}

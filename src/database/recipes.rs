// ABOUTME: Recipe persistence: filtered listing, loading with lines and tags, and deletion
// ABOUTME: Also provides the connection-scoped writes used by the composite recipe writer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use pantry_core::models::{Recipe, RecipeIngredient, RecipeSummary, Tag, User};
use pantry_core::pagination::PageRequest;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::tags::row_to_tag;
use super::{column_to_u32, format_timestamp, parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};

const RECIPE_COLUMNS: &str = r"
    r.id, r.name, r.text, r.cooking_time, r.pub_date,
    u.id AS author_id, u.email AS author_email, u.username AS author_username,
    u.first_name AS author_first_name, u.last_name AS author_last_name,
    u.is_admin AS author_is_admin, u.created_at AS author_created_at
";

/// Filters accepted by the recipe list
#[derive(Debug, Clone, Default)]
pub struct ListRecipesFilter {
    /// Tag slugs; a recipe matches when it carries any of them
    pub tags: Vec<String>,
    /// Only recipes by this author
    pub author: Option<Uuid>,
    /// Only recipes in this user's favorites
    pub favorited_by: Option<Uuid>,
    /// Only recipes in this user's shopping cart
    pub in_cart_of: Option<Uuid>,
}

/// Manager for recipes, their ingredient lines, and tag links
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load a recipe with author, tags, and ingredient lines
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r JOIN users u ON u.id = r.author_id WHERE r.id = $1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut recipes = self.hydrate(vec![row_to_recipe(&row)?]).await?;
        Ok(recipes.pop())
    }

    /// List recipes newest first
    ///
    /// Returns the page of recipes and the total number matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails
    pub async fn list(
        &self,
        filter: &ListRecipesFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Recipe>, u64)> {
        let mut count_query = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) FROM recipes r JOIN users u ON u.id = r.author_id WHERE 1 = 1",
        );
        push_filters(&mut count_query, filter);
        let count: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r JOIN users u ON u.id = r.author_id WHERE 1 = 1"
        ));
        push_filters(&mut query, filter);
        query
            .push(" ORDER BY r.pub_date DESC, r.rowid DESC LIMIT ")
            .push_bind(page.sql_limit())
            .push(" OFFSET ")
            .push_bind(page.sql_offset());

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let recipes = rows.iter().map(row_to_recipe).collect::<AppResult<Vec<_>>>()?;
        let recipes = self.hydrate(recipes).await?;

        debug!(count, returned = recipes.len(), "Listed recipes");
        Ok((recipes, u64::try_from(count).unwrap_or(0)))
    }

    /// Delete a recipe; lines, tag links, favorites, and cart entries cascade
    ///
    /// Returns `false` when no such recipe exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(recipe_id = %id, "Recipe deleted");
        }
        Ok(deleted)
    }

    /// Newest recipes of an author in short form, optionally truncated
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u32>,
    ) -> AppResult<Vec<RecipeSummary>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, cooking_time FROM recipes
            WHERE author_id = $1
            ORDER BY pub_date DESC, rowid DESC
            LIMIT $2
            ",
        )
        .bind(author_id.to_string())
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list author recipes: {e}")))?;

        rows.iter().map(row_to_summary).collect()
    }

    /// Number of recipes published by an author
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_by_author(&self, author_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
            .bind(author_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count author recipes: {e}")))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Attach ingredient lines and tags to recipe headers
    async fn hydrate(&self, mut recipes: Vec<Recipe>) -> AppResult<Vec<Recipe>> {
        if recipes.is_empty() {
            return Ok(recipes);
        }
        let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        let mut lines = Self::load_lines(&mut conn, &ids).await?;
        let mut tags = Self::load_tags(&mut conn, &ids).await?;

        for recipe in &mut recipes {
            recipe.ingredients = lines.remove(&recipe.id).unwrap_or_default();
            recipe.tags = tags.remove(&recipe.id).unwrap_or_default();
        }
        Ok(recipes)
    }

    async fn load_lines(
        conn: &mut SqliteConnection,
        recipe_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<RecipeIngredient>>> {
        let mut query = QueryBuilder::<Sqlite>::new(
            r"
            SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id IN (",
        );
        push_id_list(&mut query, recipe_ids);
        query.push(" ORDER BY i.name, i.measurement_unit");

        let rows = query
            .build()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to load recipe ingredients: {e}")))?;

        let mut by_recipe: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
        for row in &rows {
            let recipe_id: String = row.get("recipe_id");
            let id: String = row.get("id");
            let amount: i64 = row.get("amount");
            by_recipe
                .entry(parse_uuid(&recipe_id)?)
                .or_default()
                .push(RecipeIngredient {
                    id: parse_uuid(&id)?,
                    name: row.get("name"),
                    measurement_unit: row.get("measurement_unit"),
                    amount: column_to_u32(amount, "amount")?,
                });
        }
        Ok(by_recipe)
    }

    async fn load_tags(
        conn: &mut SqliteConnection,
        recipe_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<Tag>>> {
        let mut query = QueryBuilder::<Sqlite>::new(
            r"
            SELECT rt.recipe_id, t.id, t.name, t.slug, t.color
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id IN (",
        );
        push_id_list(&mut query, recipe_ids);
        query.push(" ORDER BY t.name");

        let rows = query
            .build()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to load recipe tags: {e}")))?;

        let mut by_recipe: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for row in &rows {
            let recipe_id: String = row.get("recipe_id");
            by_recipe
                .entry(parse_uuid(&recipe_id)?)
                .or_default()
                .push(row_to_tag(row)?);
        }
        Ok(by_recipe)
    }

    /// Check whether a recipe exists, on an existing connection
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn exists(conn: &mut SqliteConnection, id: Uuid) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM recipes WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to check recipe: {e}")))?;
        Ok(found.is_some())
    }

    /// Of the given tag ids, return those that exist
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn existing_tag_ids(
        conn: &mut SqliteConnection,
        ids: &[Uuid],
    ) -> AppResult<HashSet<Uuid>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM tags WHERE id IN (");
        push_id_list(&mut query, ids);

        let found: Vec<String> = query
            .build_query_scalar::<String>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to load tags: {e}")))?;

        found.iter().map(|id| parse_uuid(id)).collect()
    }

    /// Insert the recipe row
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_recipe(
        conn: &mut SqliteConnection,
        id: Uuid,
        author_id: Uuid,
        name: &str,
        text: &str,
        cooking_time: u32,
        pub_date: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO recipes (id, author_id, name, text, cooking_time, pub_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(id.to_string())
        .bind(author_id.to_string())
        .bind(name)
        .bind(text)
        .bind(i64::from(cooking_time))
        .bind(format_timestamp(pub_date))
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert recipe: {e}")))?;
        Ok(())
    }

    /// Apply scalar field changes; `None` leaves a field untouched
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_fields(
        conn: &mut SqliteConnection,
        id: Uuid,
        name: Option<&str>,
        text: Option<&str>,
        cooking_time: Option<u32>,
    ) -> AppResult<()> {
        if name.is_none() && text.is_none() && cooking_time.is_none() {
            return Ok(());
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE recipes SET ");
        let mut assignments = query.separated(", ");
        if let Some(name) = name {
            assignments.push("name = ").push_bind_unseparated(name.to_owned());
        }
        if let Some(text) = text {
            assignments.push("text = ").push_bind_unseparated(text.to_owned());
        }
        if let Some(cooking_time) = cooking_time {
            assignments
                .push("cooking_time = ")
                .push_bind_unseparated(i64::from(cooking_time));
        }
        query.push(" WHERE id = ").push_bind(id.to_string());

        query
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;
        Ok(())
    }

    /// Delete every ingredient line of a recipe and insert the given ones
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn replace_lines(
        conn: &mut SqliteConnection,
        recipe_id: Uuid,
        lines: &[(Uuid, u32)],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear recipe ingredients: {e}")))?;

        if lines.is_empty() {
            return Ok(());
        }

        let mut insert = QueryBuilder::<Sqlite>::new(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) ",
        );
        insert.push_values(lines, |mut row, (ingredient_id, amount)| {
            row.push_bind(recipe_id.to_string())
                .push_bind(ingredient_id.to_string())
                .push_bind(i64::from(*amount));
        });
        insert
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert recipe ingredients: {e}")))?;
        Ok(())
    }

    /// Delete every tag link of a recipe and attach the given tags
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn replace_tags(
        conn: &mut SqliteConnection,
        recipe_id: Uuid,
        tag_ids: &[Uuid],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear recipe tags: {e}")))?;

        if tag_ids.is_empty() {
            return Ok(());
        }

        let mut insert = QueryBuilder::<Sqlite>::new("INSERT INTO recipe_tags (recipe_id, tag_id) ");
        insert.push_values(tag_ids, |mut row, tag_id| {
            row.push_bind(recipe_id.to_string())
                .push_bind(tag_id.to_string());
        });
        insert
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to attach recipe tags: {e}")))?;
        Ok(())
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &ListRecipesFilter) {
    if let Some(author) = filter.author {
        query.push(" AND r.author_id = ").push_bind(author.to_string());
    }

    if !filter.tags.is_empty() {
        query.push(
            r" AND EXISTS (
                SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id
                WHERE rt.recipe_id = r.id AND t.slug IN (",
        );
        let mut slugs = query.separated(", ");
        for slug in &filter.tags {
            slugs.push_bind(slug.clone());
        }
        slugs.push_unseparated("))");
    }

    if let Some(user_id) = filter.favorited_by {
        query
            .push(" AND EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ")
            .push_bind(user_id.to_string())
            .push(")");
    }

    if let Some(user_id) = filter.in_cart_of {
        query
            .push(" AND EXISTS (SELECT 1 FROM shopping_cart c WHERE c.recipe_id = r.id AND c.user_id = ")
            .push_bind(user_id.to_string())
            .push(")");
    }
}

/// Push `?, ?, ...)` for an id list; the caller has already pushed the `(`
fn push_id_list(query: &mut QueryBuilder<'_, Sqlite>, ids: &[Uuid]) {
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
    separated.push_unseparated(")");
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let id: String = row.get("id");
    let cooking_time: i64 = row.get("cooking_time");
    let pub_date: String = row.get("pub_date");
    let author_id: String = row.get("author_id");
    let author_created_at: String = row.get("author_created_at");

    Ok(Recipe {
        id: parse_uuid(&id)?,
        author: User {
            id: parse_uuid(&author_id)?,
            email: row.get("author_email"),
            username: row.get("author_username"),
            first_name: row.get("author_first_name"),
            last_name: row.get("author_last_name"),
            is_admin: row.get("author_is_admin"),
            created_at: parse_timestamp(&author_created_at)?,
        },
        name: row.get("name"),
        text: row.get("text"),
        cooking_time: column_to_u32(cooking_time, "cooking_time")?,
        pub_date: parse_timestamp(&pub_date)?,
        tags: Vec::new(),
        ingredients: Vec::new(),
    })
}

/// Convert an `(id, name, cooking_time)` row into a `RecipeSummary`
pub(crate) fn row_to_summary(row: &SqliteRow) -> AppResult<RecipeSummary> {
    let id: String = row.get("id");
    let cooking_time: i64 = row.get("cooking_time");
    Ok(RecipeSummary {
        id: parse_uuid(&id)?,
        name: row.get("name"),
        cooking_time: column_to_u32(cooking_time, "cooking_time")?,
    })
}

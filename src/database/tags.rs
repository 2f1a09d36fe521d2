// ABOUTME: Tag reference data: creation with slug/color validation, lookup, and listing
// ABOUTME: Tags are shared across recipes and used by the recipe list filter via their slug
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::sync::LazyLock;

use pantry_core::constants::limits::{TAG_NAME_MAX_LEN, TAG_SLUG_MAX_LEN};
use pantry_core::models::{NewTag, Tag};
use regex::Regex;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::parse_uuid;
use crate::errors::{AppError, AppResult, FieldIssue};

static SLUG_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").ok());
static COLOR_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").ok());

/// Manager for the tags table
pub struct TagsManager {
    pool: SqlitePool,
}

impl TagsManager {
    /// Create a new tags manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a tag
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed fields, `RESOURCE_ALREADY_EXISTS`
    /// when name, slug, or color is taken, or a database error
    pub async fn create(&self, new_tag: &NewTag) -> AppResult<Tag> {
        let issues = validate_new_tag(new_tag);
        if !issues.is_empty() {
            return Err(AppError::validation(issues));
        }

        let tag = Tag {
            id: Uuid::new_v4(),
            name: new_tag.name.trim().to_owned(),
            slug: new_tag.slug.trim().to_owned(),
            color: new_tag.color.trim().to_uppercase(),
        };

        sqlx::query("INSERT INTO tags (id, name, slug, color) VALUES ($1, $2, $3, $4)")
            .bind(tag.id.to_string())
            .bind(&tag.name)
            .bind(&tag.slug)
            .bind(&tag.color)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::already_exists("A tag with this name, slug, or color already exists")
                }
                other => AppError::database(format!("Failed to create tag: {other}")),
            })?;

        info!(tag_id = %tag.id, slug = %tag.slug, "Tag created");
        Ok(tag)
    }

    /// Get a tag by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, slug, color FROM tags WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tag: {e}")))?;

        row.as_ref().map(row_to_tag).transpose()
    }

    /// List all tags ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, slug, color FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list tags: {e}")))?;

        rows.iter().map(row_to_tag).collect()
    }
}

fn validate_new_tag(new_tag: &NewTag) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    let name = new_tag.name.trim();
    if name.is_empty() || name.chars().count() > TAG_NAME_MAX_LEN {
        issues.push(FieldIssue::new(
            "name",
            format!("Name must be between 1 and {TAG_NAME_MAX_LEN} characters"),
        ));
    }

    let slug = new_tag.slug.trim();
    let slug_ok = SLUG_PATTERN.as_ref().is_some_and(|re| re.is_match(slug));
    if !slug_ok || slug.len() > TAG_SLUG_MAX_LEN {
        issues.push(FieldIssue::new(
            "slug",
            "Slug may contain only letters, digits, hyphens and underscores",
        ));
    }

    let color_ok = COLOR_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(new_tag.color.trim()));
    if !color_ok {
        issues.push(FieldIssue::new("color", "Color must be a hex value like #E26C2D"));
    }

    issues
}

/// Convert a `(id, name, slug, color)` row into a `Tag`
pub(crate) fn row_to_tag(row: &SqliteRow) -> AppResult<Tag> {
    let id: String = row.get("id");
    Ok(Tag {
        id: parse_uuid(&id)?,
        name: row.get("name"),
        slug: row.get("slug"),
        color: row.get("color"),
    })
}

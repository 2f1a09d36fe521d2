// ABOUTME: User storage: creation, lookup by id or email, and paginated listing
// ABOUTME: Accounts are provisioned by the admin tool or the identity service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::sync::LazyLock;

use chrono::Utc;
use pantry_core::models::{NewUser, User};
use pantry_core::pagination::PageRequest;
use regex::Regex;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult, FieldIssue};

static USERNAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").ok());

const USER_COLUMNS: &str = "id, email, username, first_name, last_name, is_admin, created_at";

/// Manager for the users table
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed fields, `RESOURCE_ALREADY_EXISTS`
    /// when the email or username is taken, or a database error
    pub async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        let issues = validate_new_user(new_user);
        if !issues.is_empty() {
            return Err(AppError::validation(issues));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.trim().to_lowercase(),
            username: new_user.username.trim().to_owned(),
            first_name: new_user.first_name.trim().to_owned(),
            last_name: new_user.last_name.trim().to_owned(),
            is_admin: new_user.is_admin,
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO users (id, email, username, first_name, last_name, is_admin, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_admin)
        .bind(format_timestamp(user.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::already_exists("A user with this email or username already exists")
            }
            other => AppError::database(format!("Failed to create user: {other}")),
        })?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Get a user by email (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// List users ordered by username
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<User>, u64)> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;

        let users = rows.iter().map(row_to_user).collect::<AppResult<Vec<_>>>()?;
        Ok((users, u64::try_from(count).unwrap_or(0)))
    }
}

fn validate_new_user(new_user: &NewUser) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    let email = new_user.email.trim();
    if email.is_empty() || !email.contains('@') || email.len() > 254 {
        issues.push(FieldIssue::new("email", "Enter a valid email address"));
    }

    let username = new_user.username.trim();
    let username_ok = USERNAME_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(username));
    if username.is_empty() || username.len() > 150 || !username_ok {
        issues.push(FieldIssue::new(
            "username",
            "Username may contain only letters, digits and @/./+/-/_",
        ));
    }
    if username.eq_ignore_ascii_case("me") {
        issues.push(FieldIssue::new("username", "Username 'me' is reserved"));
    }

    for (field, value) in [
        ("first_name", &new_user.first_name),
        ("last_name", &new_user.last_name),
    ] {
        if value.trim().is_empty() {
            issues.push(FieldIssue::new(field, "This field may not be blank"));
        } else if value.chars().count() > 150 {
            issues.push(FieldIssue::new(field, "Must be at most 150 characters"));
        }
    }

    issues
}

/// Convert a row selected with the user columns into a `User`
pub(crate) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    Ok(User {
        id: parse_uuid(&id)?,
        email: row.get("email"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        is_admin: row.get("is_admin"),
        created_at: parse_timestamp(&created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            email: format!("{username}@example.com"),
            username: username.into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            is_admin: false,
        }
    }

    #[test]
    fn test_valid_user_passes() {
        assert!(validate_new_user(&new_user("chef.anna")).is_empty());
    }

    #[test]
    fn test_reserved_and_malformed_usernames() {
        assert!(!validate_new_user(&new_user("me")).is_empty());
        assert!(!validate_new_user(&new_user("has space")).is_empty());
    }

    #[test]
    fn test_blank_names_reported_per_field() {
        let mut user = new_user("cook");
        user.first_name = "  ".into();
        user.email = "not-an-email".into();
        let fields: Vec<_> = validate_new_user(&user)
            .into_iter()
            .map(|i| i.field)
            .collect();
        assert_eq!(fields, vec!["email", "first_name"]);
    }
}

// ABOUTME: Subscriptions from users to recipe authors
// ABOUTME: Self-subscription is rejected before any state is consulted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::collections::HashSet;

use chrono::Utc;
use pantry_core::models::{AddOutcome, RemoveOutcome, User};
use pantry_core::pagination::PageRequest;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::users::row_to_user;
use super::{format_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};

/// Manager for the subscriptions relation
pub struct SubscriptionsManager {
    pool: SqlitePool,
}

impl SubscriptionsManager {
    /// Create a new subscriptions manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Subscribe `follower_id` to `author_id`
    ///
    /// Returns the author when the subscription was created, or
    /// `AlreadyExists` when it was already present.
    ///
    /// # Errors
    ///
    /// Returns `SELF_SUBSCRIPTION` when both ids are equal (regardless of
    /// existing state), `RESOURCE_NOT_FOUND` for an unknown author, or a
    /// database error
    pub async fn subscribe(&self, follower_id: Uuid, author_id: Uuid) -> AppResult<AddOutcome<User>> {
        if follower_id == author_id {
            return Err(AppError::self_subscription());
        }
        let author = self.author(author_id).await?;

        let result = sqlx::query(
            r"
            INSERT INTO subscriptions (user_id, author_id, created_at) VALUES ($1, $2, $3)
            ON CONFLICT (user_id, author_id) DO NOTHING
            ",
        )
        .bind(follower_id.to_string())
        .bind(author_id.to_string())
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to subscribe: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(AddOutcome::AlreadyExists);
        }

        info!(follower_id = %follower_id, author_id = %author_id, "Subscription created");
        Ok(AddOutcome::Created(author))
    }

    /// Remove a subscription
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown author, or a database error
    pub async fn unsubscribe(&self, follower_id: Uuid, author_id: Uuid) -> AppResult<RemoveOutcome> {
        self.author(author_id).await?;

        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(follower_id.to_string())
            .bind(author_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to unsubscribe: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(RemoveOutcome::NotFound);
        }

        info!(follower_id = %follower_id, author_id = %author_id, "Subscription removed");
        Ok(RemoveOutcome::Removed)
    }

    /// Check whether `follower_id` follows `author_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn is_subscribed(&self, follower_id: Uuid, author_id: Uuid) -> AppResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM subscriptions WHERE user_id = $1 AND author_id = $2")
                .bind(follower_id.to_string())
                .bind(author_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check subscription: {e}")))?;
        Ok(found.is_some())
    }

    /// Of the given authors, return those `follower_id` follows
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn followed_among(
        &self,
        follower_id: Uuid,
        author_ids: &[Uuid],
    ) -> AppResult<HashSet<Uuid>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT author_id FROM subscriptions WHERE user_id = ");
        query.push_bind(follower_id.to_string()).push(" AND author_id IN (");
        let mut separated = query.separated(", ");
        for id in author_ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let found: Vec<String> = query
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load subscriptions: {e}")))?;

        found.iter().map(|id| parse_uuid(id)).collect()
    }

    /// Authors followed by `follower_id`, ordered by username
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn authors(&self, follower_id: Uuid, page: PageRequest) -> AppResult<(Vec<User>, u64)> {
        let rows = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.is_admin, u.created_at
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.user_id = $1
            ORDER BY u.username
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(follower_id.to_string())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
            .bind(follower_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count subscriptions: {e}")))?;

        let authors = rows.iter().map(row_to_user).collect::<AppResult<Vec<_>>>()?;
        Ok((authors, u64::try_from(count).unwrap_or(0)))
    }

    async fn author(&self, author_id: Uuid) -> AppResult<User> {
        let row = sqlx::query(
            "SELECT id, email, username, first_name, last_name, is_admin, created_at FROM users WHERE id = $1",
        )
        .bind(author_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get author: {e}")))?
        .ok_or_else(|| AppError::not_found("User"))?;
        row_to_user(&row)
    }
}

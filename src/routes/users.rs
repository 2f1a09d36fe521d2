// ABOUTME: User and subscription endpoints
// ABOUTME: Lists users, shows the current user, and follows or unfollows recipe authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! User routes
//!
//! Reading users is public. `me`, the subscription list, and subscribe /
//! unsubscribe require a bearer token.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pantry_core::models::{AddOutcome, RecipeSummary, RemoveOutcome, User};
use pantry_core::pagination::{Page, PageParams, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{authenticate, authenticate_optional, parse_id};
use crate::errors::AppError;
use crate::server::ServerResources;

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    /// User id
    pub id: Uuid,
    /// Email address
    pub email: String,
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the requesting user follows this user
    pub is_subscribed: bool,
}

impl UserView {
    /// Build the view for a viewer-specific subscription flag
    #[must_use]
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// A followed author with their latest recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionView {
    /// The author
    #[serde(flatten)]
    pub author: UserView,
    /// Newest recipes, truncated to `recipes_limit`
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by the author
    pub recipes_count: u64,
}

/// Query parameters for subscription endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Authors per page
    pub limit: Option<u32>,
    /// Recipes shown per author; kept raw so a malformed value is ignored
    pub recipes_limit: Option<String>,
}

impl SubscriptionQuery {
    /// Recipes shown per author, or `None` when absent or not a number
    #[must_use]
    pub fn recipes_limit(&self) -> Option<u32> {
        self.recipes_limit
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
    }
}

/// User routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users", get(Self::handle_list))
            .route("/api/users/me", get(Self::handle_me))
            .route("/api/users/subscriptions", get(Self::handle_subscriptions))
            .route("/api/users/:id", get(Self::handle_get))
            .route(
                "/api/users/:id/subscribe",
                post(Self::handle_subscribe).delete(Self::handle_unsubscribe),
            )
            .with_state(resources)
    }

    fn page_request(resources: &ServerResources, page: Option<u32>, limit: Option<u32>) -> PageRequest {
        PageParams { page, limit }.resolve(
            resources.config.pagination.default_page_size,
            resources.config.pagination.max_page_size,
        )
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<PageParams>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources).await?;
        let page = Self::page_request(&resources, params.page, params.limit);

        let (users, count) = resources.database.users().list(page).await?;
        let followed = match &viewer {
            Some(viewer) => {
                let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
                resources
                    .database
                    .subscriptions()
                    .followed_among(viewer.id, &ids)
                    .await?
            }
            None => HashSet::new(),
        };

        let page = Page::new(users, count, page).map(|user| {
            let is_subscribed = followed.contains(&user.id);
            UserView::new(user, is_subscribed)
        });
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        Ok((StatusCode::OK, Json(UserView::new(user, false))).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources).await?;
        let id = parse_id(&id, "User")?;

        let user = resources
            .database
            .users()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let is_subscribed = match &viewer {
            Some(viewer) => {
                resources
                    .database
                    .subscriptions()
                    .is_subscribed(viewer.id, user.id)
                    .await?
            }
            None => false,
        };
        Ok((StatusCode::OK, Json(UserView::new(user, is_subscribed))).into_response())
    }

    async fn handle_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<SubscriptionQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let page = Self::page_request(&resources, query.page, query.limit);

        let (authors, count) = resources
            .database
            .subscriptions()
            .authors(user.id, page)
            .await?;

        let mut views = Vec::with_capacity(authors.len());
        for author in authors {
            views.push(Self::subscription_view(&resources, author, query.recipes_limit()).await?);
        }

        Ok((StatusCode::OK, Json(Page::new(views, count, page))).into_response())
    }

    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Query(query): Query<SubscriptionQuery>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let author_id = parse_id(&id, "User")?;

        match resources
            .database
            .subscriptions()
            .subscribe(user.id, author_id)
            .await?
        {
            AddOutcome::Created(author) => {
                let view = Self::subscription_view(&resources, author, query.recipes_limit()).await?;
                Ok((StatusCode::CREATED, Json(view)).into_response())
            }
            AddOutcome::AlreadyExists => Err(AppError::already_exists(
                "You are already subscribed to this author",
            )),
        }
    }

    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let author_id = parse_id(&id, "User")?;

        match resources
            .database
            .subscriptions()
            .unsubscribe(user.id, author_id)
            .await?
        {
            RemoveOutcome::Removed => Ok(StatusCode::NO_CONTENT.into_response()),
            RemoveOutcome::NotFound => Err(AppError::not_found("Subscription")),
        }
    }

    async fn subscription_view(
        resources: &ServerResources,
        author: User,
        recipes_limit: Option<u32>,
    ) -> Result<SubscriptionView, AppError> {
        let recipes = resources.database.recipes();
        let summaries = recipes.summaries_by_author(author.id, recipes_limit).await?;
        let recipes_count = recipes.count_by_author(author.id).await?;

        Ok(SubscriptionView {
            author: UserView::new(author, true),
            recipes: summaries,
            recipes_count,
        })
    }
}

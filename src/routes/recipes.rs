// ABOUTME: Recipe endpoints: filtered listing, composite create/update, delete, and membership toggles
// ABOUTME: Also serves the aggregated shopping list as a downloadable document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! Recipe routes
//!
//! Reads are public; responses are annotated with `is_favorited` and
//! `is_in_shopping_cart` for the requesting user. Writes require a token,
//! and changing a recipe requires its author or an admin.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::Query;
use chrono::{DateTime, Utc};
use pantry_core::models::{
    AddOutcome, Recipe, RecipeCollection, RecipeDraft, RecipeIngredient, RecipeUpdate,
    RemoveOutcome, Tag, User,
};
use pantry_core::pagination::{Page, PageParams};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::users::UserView;
use super::{authenticate, authenticate_optional, flag_enabled, parse_id};
use crate::database::ListRecipesFilter;
use crate::errors::{AppError, ErrorCode};
use crate::permissions::ensure_can_modify_recipe;
use crate::server::ServerResources;
use crate::services::recipes::RecipeWriter;
use crate::services::shopping_list::shopping_list_for;

/// Full recipe view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeView {
    /// Recipe id
    pub id: Uuid,
    /// Attached tags
    pub tags: Vec<Tag>,
    /// Author, with the viewer's subscription flag
    pub author: UserView,
    /// Ingredient lines
    pub ingredients: Vec<RecipeIngredient>,
    /// In the viewer's favorites
    pub is_favorited: bool,
    /// In the viewer's shopping cart
    pub is_in_shopping_cart: bool,
    /// Title
    pub name: String,
    /// Description
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: u32,
    /// Publication timestamp
    pub pub_date: DateTime<Utc>,
}

/// Viewer-specific flags for a batch of recipes
#[derive(Debug, Default)]
struct ViewerFlags {
    favorited: HashSet<Uuid>,
    in_cart: HashSet<Uuid>,
    followed_authors: HashSet<Uuid>,
}

impl ViewerFlags {
    async fn load(
        resources: &ServerResources,
        viewer: Option<&User>,
        recipes: &[Recipe],
    ) -> Result<Self, AppError> {
        let Some(viewer) = viewer else {
            return Ok(Self::default());
        };

        let recipe_ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
        let author_ids: Vec<Uuid> = recipes.iter().map(|r| r.author.id).collect();
        let memberships = resources.database.memberships();

        Ok(Self {
            favorited: memberships
                .members_among(RecipeCollection::Favorites, viewer.id, &recipe_ids)
                .await?,
            in_cart: memberships
                .members_among(RecipeCollection::ShoppingCart, viewer.id, &recipe_ids)
                .await?,
            followed_authors: resources
                .database
                .subscriptions()
                .followed_among(viewer.id, &author_ids)
                .await?,
        })
    }

    fn view(&self, recipe: Recipe) -> RecipeView {
        let is_subscribed = self.followed_authors.contains(&recipe.author.id);
        RecipeView {
            id: recipe.id,
            is_favorited: self.favorited.contains(&recipe.id),
            is_in_shopping_cart: self.in_cart.contains(&recipe.id),
            tags: recipe.tags,
            author: UserView::new(recipe.author, is_subscribed),
            ingredients: recipe.ingredients,
            name: recipe.name,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
            pub_date: recipe.pub_date,
        }
    }
}

/// Query parameters for the recipe list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeListQuery {
    /// Tag slugs; repeated `tags=` keys match any of them
    #[serde(default)]
    pub tags: Vec<String>,
    /// Author id
    pub author: Option<String>,
    /// `1` to list only the viewer's favorites
    pub is_favorited: Option<String>,
    /// `1` to list only recipes in the viewer's cart
    pub is_in_shopping_cart: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Recipes per page
    pub limit: Option<u32>,
}

/// Recipe routes
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/download_shopping_cart",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/recipes/:id/favorite",
                post(Self::handle_add_favorite).delete(Self::handle_remove_favorite),
            )
            .route(
                "/api/recipes/:id/shopping_cart",
                post(Self::handle_add_to_cart).delete(Self::handle_remove_from_cart),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<RecipeListQuery>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources).await?;
        let page = PageParams {
            page: query.page,
            limit: query.limit,
        }
        .resolve(
            resources.config.pagination.default_page_size,
            resources.config.pagination.max_page_size,
        );

        let author = query
            .author
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .map(|a| {
                Uuid::parse_str(a.trim())
                    .map_err(|_| AppError::invalid_input(format!("Invalid author id: {a}")))
            })
            .transpose()?;

        let wants_favorites = flag_enabled(query.is_favorited.as_deref());
        let wants_cart = flag_enabled(query.is_in_shopping_cart.as_deref());

        // Membership filters are per-user; anonymous viewers have none.
        if viewer.is_none() && (wants_favorites || wants_cart) {
            let empty: Page<RecipeView> = Page::new(Vec::new(), 0, page);
            return Ok((StatusCode::OK, Json(empty)).into_response());
        }

        let viewer_id = viewer.as_ref().map(|v| v.id);
        let filter = ListRecipesFilter {
            tags: query.tags,
            author,
            favorited_by: viewer_id.filter(|_| wants_favorites),
            in_cart_of: viewer_id.filter(|_| wants_cart),
        };

        let (recipes, count) = resources.database.recipes().list(&filter, page).await?;
        let flags = ViewerFlags::load(&resources, viewer.as_ref(), &recipes).await?;
        let page = Page::new(recipes, count, page).map(|recipe| flags.view(recipe));

        Ok((StatusCode::OK, Json(page)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let viewer = authenticate_optional(&headers, &resources).await?;
        let recipe = Self::load_recipe(&resources, &id).await?;
        let view = Self::single_view(&resources, viewer.as_ref(), recipe).await?;
        Ok((StatusCode::OK, Json(view)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(draft): Json<RecipeDraft>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;

        let recipe = RecipeWriter::new(resources.database.pool().clone())
            .create(&user, &draft)
            .await?;

        let view = Self::single_view(&resources, Some(&user), recipe).await?;
        Ok((StatusCode::CREATED, Json(view)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(update): Json<RecipeUpdate>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let existing = Self::load_recipe(&resources, &id).await?;
        ensure_can_modify_recipe(&user, &existing)?;

        let recipe = RecipeWriter::new(resources.database.pool().clone())
            .update(existing.id, &update)
            .await?;

        let view = Self::single_view(&resources, Some(&user), recipe).await?;
        Ok((StatusCode::OK, Json(view)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let existing = Self::load_recipe(&resources, &id).await?;
        ensure_can_modify_recipe(&user, &existing)?;

        if resources.database.recipes().delete(existing.id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found("Recipe"))
        }
    }

    async fn handle_add_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::add_to_collection(&resources, &headers, &id, RecipeCollection::Favorites).await
    }

    async fn handle_remove_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::remove_from_collection(&resources, &headers, &id, RecipeCollection::Favorites).await
    }

    async fn handle_add_to_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::add_to_collection(&resources, &headers, &id, RecipeCollection::ShoppingCart).await
    }

    async fn handle_remove_from_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::remove_from_collection(&resources, &headers, &id, RecipeCollection::ShoppingCart)
            .await
    }

    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = authenticate(&headers, &resources).await?;
        let entries = shopping_list_for(&resources.database.memberships(), user.id).await?;

        let renderer = &resources.renderer;
        let body = renderer.render(&entries);
        let disposition = HeaderValue::from_str(&format!(
            "attachment; filename=\"{}\"",
            renderer.file_name()
        ))
        .map_err(|e| AppError::internal(format!("Invalid download header: {e}")))?;

        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(renderer.content_type())),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            body,
        )
            .into_response())
    }

    async fn add_to_collection(
        resources: &Arc<ServerResources>,
        headers: &HeaderMap,
        id: &str,
        collection: RecipeCollection,
    ) -> Result<Response, AppError> {
        let user = authenticate(headers, resources).await?;
        let recipe_id = parse_id(id, "Recipe")?;

        match resources
            .database
            .memberships()
            .add(collection, user.id, recipe_id)
            .await?
        {
            AddOutcome::Created(summary) => Ok((StatusCode::CREATED, Json(summary)).into_response()),
            AddOutcome::AlreadyExists => Err(AppError::already_exists(format!(
                "Recipe is already in {}",
                collection.display_name()
            ))),
        }
    }

    async fn remove_from_collection(
        resources: &Arc<ServerResources>,
        headers: &HeaderMap,
        id: &str,
        collection: RecipeCollection,
    ) -> Result<Response, AppError> {
        let user = authenticate(headers, resources).await?;
        let recipe_id = parse_id(id, "Recipe")?;

        match resources
            .database
            .memberships()
            .remove(collection, user.id, recipe_id)
            .await?
        {
            RemoveOutcome::Removed => Ok(StatusCode::NO_CONTENT.into_response()),
            RemoveOutcome::NotFound => Err(AppError::new(
                ErrorCode::ResourceNotFound,
                format!("Recipe is not in {}", collection.display_name()),
            )),
        }
    }

    async fn load_recipe(resources: &ServerResources, id: &str) -> Result<Recipe, AppError> {
        let id = parse_id(id, "Recipe")?;
        resources
            .database
            .recipes()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))
    }

    async fn single_view(
        resources: &ServerResources,
        viewer: Option<&User>,
        recipe: Recipe,
    ) -> Result<RecipeView, AppError> {
        let recipes = [recipe];
        let flags = ViewerFlags::load(resources, viewer, &recipes).await?;
        let [recipe] = recipes;
        Ok(flags.view(recipe))
    }
}

// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, seeded users and reference data, and an HTTP app
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `pantry_server`

use std::sync::{Arc, Once};

use pantry_server::{
    auth::AuthManager,
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    models::{Ingredient, IngredientAmount, NewIngredient, NewTag, NewUser, Recipe, RecipeDraft, Tag, User},
    server::ServerResources,
    services::recipes::RecipeWriter,
};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory database with the schema applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new(&DatabaseUrl::Memory, 1).await.unwrap()
}

/// Create a regular user named `username`
pub async fn create_user(db: &Database, username: &str) -> User {
    db.users()
        .create(&NewUser {
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            first_name: "Test".to_owned(),
            last_name: username.to_owned(),
            is_admin: false,
        })
        .await
        .unwrap()
}

/// Create an admin user named `username`
pub async fn create_admin(db: &Database, username: &str) -> User {
    db.users()
        .create(&NewUser {
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            first_name: "Admin".to_owned(),
            last_name: username.to_owned(),
            is_admin: true,
        })
        .await
        .unwrap()
}

/// Create an ingredient
pub async fn create_ingredient(db: &Database, name: &str, unit: &str) -> Ingredient {
    db.ingredients()
        .create(&NewIngredient {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        })
        .await
        .unwrap()
}

/// Create a tag whose slug is the lowercased name
pub async fn create_tag(db: &Database, name: &str, color: &str) -> Tag {
    db.tags()
        .create(&NewTag {
            name: name.to_owned(),
            slug: name.to_lowercase(),
            color: color.to_owned(),
        })
        .await
        .unwrap()
}

/// Draft with the given lines and tags
pub fn draft(name: &str, lines: &[(Uuid, i64)], tags: &[Uuid]) -> RecipeDraft {
    RecipeDraft {
        name: name.to_owned(),
        text: format!("How to make {name}"),
        cooking_time: 20,
        ingredients: lines
            .iter()
            .map(|(id, amount)| IngredientAmount::new(*id, *amount))
            .collect(),
        tags: tags.to_vec(),
    }
}

/// Persist a recipe through the composite writer
pub async fn create_recipe(
    db: &Database,
    author: &User,
    name: &str,
    lines: &[(Uuid, i64)],
    tags: &[Uuid],
) -> Recipe {
    RecipeWriter::new(db.pool().clone())
        .create(author, &draft(name, lines, tags))
        .await
        .unwrap()
}

/// Server resources over a fresh database with the test configuration
pub async fn create_test_resources() -> Arc<ServerResources> {
    let database = create_test_database().await;
    let config = ServerConfig::for_testing();
    let auth_manager = AuthManager::from_config(&config.auth).unwrap();
    Arc::new(ServerResources::new(database, auth_manager, Arc::new(config)))
}

/// `Authorization` header value for a user
pub fn bearer(resources: &ServerResources, user: &User) -> String {
    format!(
        "Bearer {}",
        resources.auth_manager.generate_token(user).unwrap()
    )
}

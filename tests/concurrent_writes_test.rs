// ABOUTME: Concurrency tests for recipe writes and membership adds on a file-backed pool
// ABOUTME: Many tasks write at once; every write must succeed or report a named outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use pantry_server::{
    config::DatabaseUrl,
    database::{Database, ListRecipesFilter},
    models::{AddOutcome, IngredientAmount, RecipeCollection, RecipeUpdate},
    pagination::PageRequest,
    services::recipes::RecipeWriter,
};
use tempfile::TempDir;

const POOL_SIZE: u32 = 5;

async fn file_database() -> (TempDir, Database) {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("pantry.db"),
    };
    let db = Database::new(&url, POOL_SIZE).await.unwrap();
    (dir, db)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_recipe_creates_all_succeed() {
    let (_dir, db) = file_database().await;
    let author = common::create_user(&db, "chef").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let sugar = common::create_ingredient(&db, "sugar", "g").await;

    let mut handles = Vec::new();
    for i in 0..40_i64 {
        let db = db.clone();
        let author = author.clone();
        let draft = common::draft(
            &format!("Recipe {i}"),
            &[(flour.id, 100 + i), (sugar.id, 10)],
            &[],
        );
        handles.push(tokio::spawn(async move {
            RecipeWriter::new(db.pool().clone())
                .create(&author, &draft)
                .await
        }));
    }

    let mut failures = Vec::new();
    for handle in handles {
        if let Err(e) = handle.await.unwrap() {
            failures.push(e.to_string());
        }
    }
    assert!(failures.is_empty(), "failed writes: {failures:?}");

    let (_, count) = db
        .recipes()
        .list(&ListRecipesFilter::default(), PageRequest::first())
        .await
        .unwrap();
    assert_eq!(count, 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_and_creates_do_not_fail() {
    let (_dir, db) = file_database().await;
    let author = common::create_user(&db, "chef").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let recipe = common::create_recipe(&db, &author, "Bread", &[(flour.id, 500)], &[]).await;

    let mut handles = Vec::new();
    for i in 0..20_i64 {
        let db = db.clone();
        let author = author.clone();
        let flour_id = flour.id;
        let recipe_id = recipe.id;
        handles.push(tokio::spawn(async move {
            let writer = RecipeWriter::new(db.pool().clone());
            if i % 2 == 0 {
                let update = RecipeUpdate {
                    name: None,
                    text: None,
                    cooking_time: Some(i + 1),
                    ingredients: vec![IngredientAmount::new(flour_id, i + 1)],
                    tags: vec![],
                };
                writer.update(recipe_id, &update).await.map(|_| ())
            } else {
                let draft = common::draft(&format!("Buns {i}"), &[(flour_id, i)], &[]);
                writer.create(&author, &draft).await.map(|_| ())
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let loaded = db.recipes().get(recipe.id).await.unwrap().unwrap();
    assert_eq!(loaded.ingredients.len(), 1);
    // Every update writes matching amount and cooking time; a torn write would not
    assert_eq!(loaded.ingredients[0].amount, loaded.cooking_time);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_favorite_adds_create_exactly_once() {
    let (_dir, db) = file_database().await;
    let author = common::create_user(&db, "chef").await;
    let reader = common::create_user(&db, "reader").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let recipe = common::create_recipe(&db, &author, "Bread", &[(flour.id, 500)], &[]).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let db = db.clone();
        let user_id = reader.id;
        let recipe_id = recipe.id;
        handles.push(tokio::spawn(async move {
            db.memberships()
                .add(RecipeCollection::Favorites, user_id, recipe_id)
                .await
        }));
    }

    let mut created = 0;
    let mut existing = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            AddOutcome::Created(summary) => {
                assert_eq!(summary.id, recipe.id);
                created += 1;
            }
            AddOutcome::AlreadyExists => existing += 1,
        }
    }
    assert_eq!(created, 1);
    assert_eq!(existing, 7);

    let members = db
        .memberships()
        .members_among(RecipeCollection::Favorites, reader.id, &[recipe.id])
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_subscriptions_create_exactly_once() {
    let (_dir, db) = file_database().await;
    let follower = common::create_user(&db, "follower").await;
    let author = common::create_user(&db, "author").await;

    let mut handles = Vec::new();
    for _ in 0..6 {
        let db = db.clone();
        let (follower_id, author_id) = (follower.id, author.id);
        handles.push(tokio::spawn(async move {
            db.subscriptions().subscribe(follower_id, author_id).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        if matches!(handle.await.unwrap().unwrap(), AddOutcome::Created(_)) {
            created += 1;
        }
    }
    assert_eq!(created, 1);
}

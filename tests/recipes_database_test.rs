// ABOUTME: Integration tests for recipe persistence through the composite writer
// ABOUTME: Covers create, replace-all updates, validation rollback, listing filters, and cascades
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use pantry_server::{
    database::ListRecipesFilter,
    errors::ErrorCode,
    models::{IngredientAmount, RecipeUpdate},
    pagination::PageRequest,
    services::recipes::RecipeWriter,
};
use uuid::Uuid;

#[tokio::test]
async fn test_create_recipe_persists_lines_and_tags() {
    let db = common::create_test_database().await;
    let author = common::create_user(&db, "chef").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let milk = common::create_ingredient(&db, "milk", "ml").await;
    let breakfast = common::create_tag(&db, "Breakfast", "#FFAA00").await;

    let recipe = common::create_recipe(
        &db,
        &author,
        "Pancakes",
        &[(flour.id, 200), (milk.id, 300)],
        &[breakfast.id],
    )
    .await;

    let loaded = db.recipes().get(recipe.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "Pancakes");
    assert_eq!(loaded.author.id, author.id);
    assert_eq!(loaded.ingredients.len(), 2);
    assert_eq!(loaded.ingredients[0].name, "flour");
    assert_eq!(loaded.ingredients[0].amount, 200);
    assert_eq!(loaded.ingredients[1].name, "milk");
    assert_eq!(loaded.tags.len(), 1);
    assert_eq!(loaded.tags[0].slug, "breakfast");
}

#[tokio::test]
async fn test_update_replaces_lines_and_tags() {
    let db = common::create_test_database().await;
    let author = common::create_user(&db, "chef").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let sugar = common::create_ingredient(&db, "sugar", "g").await;
    let sweet = common::create_tag(&db, "Sweet", "#FF0000").await;
    let quick = common::create_tag(&db, "Quick", "#00FF00").await;

    let recipe =
        common::create_recipe(&db, &author, "Cake", &[(flour.id, 300)], &[sweet.id]).await;

    let update = RecipeUpdate {
        name: Some("Sugar cake".to_owned()),
        text: None,
        cooking_time: Some(45),
        ingredients: vec![IngredientAmount::new(sugar.id, 150)],
        tags: vec![quick.id],
    };
    let updated = RecipeWriter::new(db.pool().clone())
        .update(recipe.id, &update)
        .await
        .unwrap();

    assert_eq!(updated.name, "Sugar cake");
    assert_eq!(updated.text, recipe.text);
    assert_eq!(updated.cooking_time, 45);
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].id, sugar.id);
    assert_eq!(updated.ingredients[0].amount, 150);
    assert_eq!(updated.tags.len(), 1);
    assert_eq!(updated.tags[0].id, quick.id);
}

#[tokio::test]
async fn test_invalid_draft_writes_nothing() {
    let db = common::create_test_database().await;
    let author = common::create_user(&db, "chef").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;

    let writer = RecipeWriter::new(db.pool().clone());

    let duplicate = common::draft("Bread", &[(flour.id, 100), (flour.id, 50)], &[]);
    let err = writer.create(&author, &duplicate).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let unknown_tag = common::draft("Bread", &[(flour.id, 100)], &[Uuid::new_v4()]);
    let err = writer.create(&author, &unknown_tag).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let zero_amount = common::draft("Bread", &[(flour.id, 0)], &[]);
    assert!(writer.create(&author, &zero_amount).await.is_err());

    let empty = common::draft("Bread", &[], &[]);
    assert!(writer.create(&author, &empty).await.is_err());

    let (recipes, count) = db
        .recipes()
        .list(&ListRecipesFilter::default(), PageRequest::first())
        .await
        .unwrap();
    assert!(recipes.is_empty());
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_failed_update_keeps_previous_state() {
    let db = common::create_test_database().await;
    let author = common::create_user(&db, "chef").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;

    let recipe = common::create_recipe(&db, &author, "Bread", &[(flour.id, 500)], &[]).await;

    let update = RecipeUpdate {
        name: Some("Renamed".to_owned()),
        text: None,
        cooking_time: None,
        ingredients: vec![IngredientAmount::new(Uuid::new_v4(), 10)],
        tags: vec![],
    };
    let result = RecipeWriter::new(db.pool().clone())
        .update(recipe.id, &update)
        .await;
    assert!(result.is_err());

    let loaded = db.recipes().get(recipe.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "Bread");
    assert_eq!(loaded.ingredients.len(), 1);
    assert_eq!(loaded.ingredients[0].amount, 500);
}

#[tokio::test]
async fn test_update_missing_recipe_is_not_found() {
    let db = common::create_test_database().await;
    let flour = common::create_ingredient(&db, "flour", "g").await;

    let update = RecipeUpdate {
        name: None,
        text: None,
        cooking_time: None,
        ingredients: vec![IngredientAmount::new(flour.id, 10)],
        tags: vec![],
    };
    let err = RecipeWriter::new(db.pool().clone())
        .update(Uuid::new_v4(), &update)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_list_filters_by_tag_and_author() {
    let db = common::create_test_database().await;
    let alice = common::create_user(&db, "alice").await;
    let bob = common::create_user(&db, "bob").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let lunch = common::create_tag(&db, "Lunch", "#123456").await;
    let dinner = common::create_tag(&db, "Dinner", "#654321").await;

    common::create_recipe(&db, &alice, "Soup", &[(flour.id, 10)], &[lunch.id]).await;
    common::create_recipe(&db, &alice, "Stew", &[(flour.id, 20)], &[dinner.id]).await;
    common::create_recipe(&db, &bob, "Salad", &[(flour.id, 30)], &[lunch.id, dinner.id]).await;

    let filter = ListRecipesFilter {
        tags: vec!["lunch".to_owned()],
        ..ListRecipesFilter::default()
    };
    let (_, count) = db.recipes().list(&filter, PageRequest::first()).await.unwrap();
    assert_eq!(count, 2);

    let filter = ListRecipesFilter {
        author: Some(alice.id),
        ..ListRecipesFilter::default()
    };
    let (recipes, count) = db.recipes().list(&filter, PageRequest::first()).await.unwrap();
    assert_eq!(count, 2);
    assert!(recipes.iter().all(|r| r.author.id == alice.id));

    // Newest first
    let (recipes, _) = db
        .recipes()
        .list(&ListRecipesFilter::default(), PageRequest::first())
        .await
        .unwrap();
    assert_eq!(recipes[0].name, "Salad");
}

#[tokio::test]
async fn test_delete_recipe_cascades_memberships() {
    let db = common::create_test_database().await;
    let author = common::create_user(&db, "chef").await;
    let reader = common::create_user(&db, "reader").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let recipe = common::create_recipe(&db, &author, "Bread", &[(flour.id, 500)], &[]).await;

    db.memberships()
        .add(
            pantry_server::models::RecipeCollection::ShoppingCart,
            reader.id,
            recipe.id,
        )
        .await
        .unwrap();
    assert_eq!(db.memberships().cart_lines(reader.id).await.unwrap().len(), 1);

    assert!(db.recipes().delete(recipe.id).await.unwrap());
    assert!(db.recipes().get(recipe.id).await.unwrap().is_none());
    assert!(db.memberships().cart_lines(reader.id).await.unwrap().is_empty());
    assert!(!db.recipes().delete(recipe.id).await.unwrap());
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let url = pantry_server::config::DatabaseUrl::SQLite {
        path: dir.path().join("nested").join("pantry.db"),
    };

    let db = pantry_server::database::Database::new(&url, 2).await.unwrap();
    let author = common::create_user(&db, "chef").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let recipe = common::create_recipe(&db, &author, "Bread", &[(flour.id, 500)], &[]).await;
    db.pool().close().await;

    let reopened = pantry_server::database::Database::new(&url, 2).await.unwrap();
    let loaded = reopened.recipes().get(recipe.id).await.unwrap().unwrap();
    assert_eq!(loaded.ingredients[0].amount, 500);
}

// ABOUTME: Integration tests for shopping list aggregation over a user's cart
// ABOUTME: Checks per-(name, unit) summing, unit separation, and plain-text rendering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use pantry_server::{
    formatters::{PlainTextRenderer, ShoppingListRenderer},
    models::RecipeCollection,
    services::shopping_list::shopping_list_for,
};

#[tokio::test]
async fn test_same_ingredient_across_recipes_is_summed() {
    let db = common::create_test_database().await;
    let author = common::create_user(&db, "chef").await;
    let shopper = common::create_user(&db, "shopper").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let eggs = common::create_ingredient(&db, "eggs", "pcs").await;

    let bread = common::create_recipe(&db, &author, "Bread", &[(flour.id, 100)], &[]).await;
    let cake = common::create_recipe(
        &db,
        &author,
        "Cake",
        &[(flour.id, 50), (eggs.id, 3)],
        &[],
    )
    .await;

    for recipe in [&bread, &cake] {
        db.memberships()
            .add(RecipeCollection::ShoppingCart, shopper.id, recipe.id)
            .await
            .unwrap();
    }

    let entries = shopping_list_for(&db.memberships(), shopper.id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "eggs");
    assert_eq!(entries[0].total, 3);
    assert_eq!(entries[1].name, "flour");
    assert_eq!(entries[1].measurement_unit, "g");
    assert_eq!(entries[1].total, 150);
}

#[tokio::test]
async fn test_different_units_stay_separate() {
    let db = common::create_test_database().await;
    let author = common::create_user(&db, "chef").await;
    let sugar_g = common::create_ingredient(&db, "sugar", "g").await;
    let sugar_kg = common::create_ingredient(&db, "sugar", "kg").await;

    let jam = common::create_recipe(&db, &author, "Jam", &[(sugar_kg.id, 1)], &[]).await;
    let tea = common::create_recipe(&db, &author, "Tea", &[(sugar_g.id, 10)], &[]).await;
    for recipe in [&jam, &tea] {
        db.memberships()
            .add(RecipeCollection::ShoppingCart, author.id, recipe.id)
            .await
            .unwrap();
    }

    let entries = shopping_list_for(&db.memberships(), author.id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .any(|e| e.measurement_unit == "g" && e.total == 10));
    assert!(entries
        .iter()
        .any(|e| e.measurement_unit == "kg" && e.total == 1));
}

#[tokio::test]
async fn test_empty_cart_gives_empty_list() {
    let db = common::create_test_database().await;
    let user = common::create_user(&db, "shopper").await;

    let entries = shopping_list_for(&db.memberships(), user.id).await.unwrap();
    assert!(entries.is_empty());

    let rendered = String::from_utf8(PlainTextRenderer.render(&entries)).unwrap();
    assert!(rendered.starts_with("Shopping list"));
}

#[tokio::test]
async fn test_favorites_do_not_feed_the_list() {
    let db = common::create_test_database().await;
    let author = common::create_user(&db, "chef").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let bread = common::create_recipe(&db, &author, "Bread", &[(flour.id, 100)], &[]).await;

    db.memberships()
        .add(RecipeCollection::Favorites, author.id, bread.id)
        .await
        .unwrap();

    let first = shopping_list_for(&db.memberships(), author.id).await.unwrap();
    let second = shopping_list_for(&db.memberships(), author.id).await.unwrap();
    assert!(first.is_empty());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_rendered_list_has_one_line_per_entry() {
    let db = common::create_test_database().await;
    let author = common::create_user(&db, "chef").await;
    let flour = common::create_ingredient(&db, "flour", "g").await;
    let bread = common::create_recipe(&db, &author, "Bread", &[(flour.id, 100)], &[]).await;
    db.memberships()
        .add(RecipeCollection::ShoppingCart, author.id, bread.id)
        .await
        .unwrap();

    let entries = shopping_list_for(&db.memberships(), author.id).await.unwrap();
    let rendered = String::from_utf8(PlainTextRenderer.render(&entries)).unwrap();
    assert!(rendered.contains("Flour, g"));
    assert!(rendered.trim_end().ends_with("100"));
}

// ABOUTME: Core data models shared by the database layer, services, and HTTP routes
// ABOUTME: Users, recipes with tags and ingredient lines, memberships, and shopping list entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

/// Favorites, cart and subscription membership outcomes
pub mod membership;
/// Recipes, tags, ingredients and composite write payloads
pub mod recipe;
/// Shopping list input lines and aggregated entries
pub mod shopping;
/// Registered users
pub mod user;

pub use membership::{AddOutcome, RecipeCollection, RemoveOutcome};
pub use recipe::{
    Ingredient, IngredientAmount, NewIngredient, NewTag, Recipe, RecipeDraft, RecipeIngredient,
    RecipeSummary, RecipeUpdate, Tag,
};
pub use shopping::{ShoppingLine, ShoppingListEntry};
pub use user::{NewUser, User};

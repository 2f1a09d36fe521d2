// ABOUTME: Recipe domain models: tags, ingredients, ingredient lines, and recipes
// ABOUTME: Also defines the create/update payloads consumed by the composite recipe writer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// A tag shared across recipes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: Uuid,
    /// Display name (unique)
    pub name: String,
    /// URL-safe identifier used by the recipe filter (unique)
    pub slug: String,
    /// Hex color, e.g. `#E26C2D`
    pub color: String,
}

/// Data required to create a tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTag {
    /// Display name
    pub name: String,
    /// URL-safe identifier
    pub slug: String,
    /// Hex color
    pub color: String,
}

/// Reference ingredient, identified by its (name, measurement unit) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier
    pub id: Uuid,
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
}

/// Data required to create an ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIngredient {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
}

/// One ingredient line of a recipe, flattened with its ingredient data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Ingredient identifier
    pub id: Uuid,
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Positive amount
    pub amount: u32,
}

/// A fully loaded recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: Uuid,
    /// Author of the recipe
    pub author: User,
    /// Recipe title
    pub name: String,
    /// Description and instructions
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: u32,
    /// Publication timestamp
    pub pub_date: DateTime<Utc>,
    /// Attached tags, ordered by name
    pub tags: Vec<Tag>,
    /// Ingredient lines, ordered by ingredient name
    pub ingredients: Vec<RecipeIngredient>,
}

/// Short recipe view returned by membership toggles and subscription lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Unique identifier
    pub id: Uuid,
    /// Recipe title
    pub name: String,
    /// Cooking time in minutes
    pub cooking_time: u32,
}

/// An (ingredient id, amount) pair as submitted by the client
///
/// `amount` is signed so that zero and negative values reach validation and can
/// be reported by ingredient name instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmount {
    /// Referenced ingredient
    #[serde(rename = "id")]
    pub ingredient_id: Uuid,
    /// Requested amount
    pub amount: i64,
}

impl IngredientAmount {
    /// Create a pair
    #[must_use]
    pub const fn new(ingredient_id: Uuid, amount: i64) -> Self {
        Self {
            ingredient_id,
            amount,
        }
    }
}

/// Payload for creating a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDraft {
    /// Recipe title
    pub name: String,
    /// Description and instructions
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Ingredient lines
    pub ingredients: Vec<IngredientAmount>,
    /// Tag identifiers
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

/// Payload for updating a recipe
///
/// Scalar fields are optional; the ingredient and tag lists always replace the
/// current ones in full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeUpdate {
    /// New title
    pub name: Option<String>,
    /// New description
    pub text: Option<String>,
    /// New cooking time
    pub cooking_time: Option<i64>,
    /// Replacement ingredient lines
    pub ingredients: Vec<IngredientAmount>,
    /// Replacement tag identifiers
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

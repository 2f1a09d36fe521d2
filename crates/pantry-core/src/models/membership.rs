// ABOUTME: Outcomes of membership toggles (favorites, shopping cart, subscriptions)
// ABOUTME: "Already exists" and "not found" are reportable states, not system failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use serde::{Deserialize, Serialize};

/// Result of adding a membership row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome<T> {
    /// The row was absent and has been created
    Created(T),
    /// The row was already present; nothing changed
    AlreadyExists,
}

/// Result of removing a membership row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The row was present and has been deleted
    Removed,
    /// There was no row to delete
    NotFound,
}

/// Per-user recipe collections backed by a (user, recipe) join table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCollection {
    /// Recipes the user marked as favorite
    Favorites,
    /// Recipes whose ingredients go into the shopping list
    ShoppingCart,
}

impl RecipeCollection {
    /// Backing table name
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    /// Human-readable collection name used in messages
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping list",
        }
    }
}

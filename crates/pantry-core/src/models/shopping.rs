// ABOUTME: Shopping list models
// ABOUTME: Raw ingredient lines read from carted recipes and the aggregated per-ingredient totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use serde::{Deserialize, Serialize};

/// One ingredient line of one carted recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingLine {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Amount required by the recipe
    pub amount: u32,
}

impl ShoppingLine {
    /// Create a line
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: u32) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// Total amount of one (name, unit) pair across the whole cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Summed amount
    pub total: u64,
}

impl ShoppingListEntry {
    /// Display label, e.g. `flour, g`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.measurement_unit)
    }
}

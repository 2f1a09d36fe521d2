// ABOUTME: Composite recipe writer: validates input and writes a recipe with its lines and tags atomically
// ABOUTME: Updates replace the full ingredient and tag sets inside a single transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use pantry_core::constants::limits::{
    MAX_COOKING_TIME, MAX_INGREDIENT_AMOUNT, MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT,
    RECIPE_NAME_MAX_LEN,
};
use pantry_core::models::{Ingredient, IngredientAmount, Recipe, RecipeDraft, RecipeUpdate, User};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::database::{begin_write, IngredientsManager, RecipesManager};
use crate::errors::{AppError, AppResult, FieldIssue};

/// Raw recipe input shared by create and update
///
/// Scalar fields are `None` when an update leaves them unchanged.
#[derive(Debug, Clone, Copy)]
pub struct RecipeInput<'a> {
    /// Recipe title
    pub name: Option<&'a str>,
    /// Description
    pub text: Option<&'a str>,
    /// Cooking time in minutes
    pub cooking_time: Option<i64>,
    /// Ingredient lines
    pub ingredients: &'a [IngredientAmount],
    /// Tag ids
    pub tags: &'a [Uuid],
}

impl<'a> From<&'a RecipeDraft> for RecipeInput<'a> {
    fn from(draft: &'a RecipeDraft) -> Self {
        Self {
            name: Some(&draft.name),
            text: Some(&draft.text),
            cooking_time: Some(draft.cooking_time),
            ingredients: &draft.ingredients,
            tags: &draft.tags,
        }
    }
}

impl<'a> From<&'a RecipeUpdate> for RecipeInput<'a> {
    fn from(update: &'a RecipeUpdate) -> Self {
        Self {
            name: update.name.as_deref(),
            text: update.text.as_deref(),
            cooking_time: update.cooking_time,
            ingredients: &update.ingredients,
            tags: &update.tags,
        }
    }
}

/// Input that passed validation, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecipe {
    /// Trimmed title
    pub name: Option<String>,
    /// Description
    pub text: Option<String>,
    /// Cooking time in minutes
    pub cooking_time: Option<u32>,
    /// `(ingredient id, amount)` pairs, one per ingredient
    pub lines: Vec<(Uuid, u32)>,
    /// Distinct tag ids in input order
    pub tags: Vec<Uuid>,
}

/// Validate recipe input against the known ingredients and tags
///
/// Every problem is collected; amounts and duplicates are reported by
/// ingredient name. Repeated tag ids are collapsed rather than rejected.
///
/// # Errors
///
/// Returns every issue found when the input is not valid
pub fn validate_recipe(
    input: RecipeInput<'_>,
    known_ingredients: &HashMap<Uuid, Ingredient>,
    known_tags: &HashSet<Uuid>,
) -> Result<ValidatedRecipe, Vec<FieldIssue>> {
    let mut issues = Vec::new();

    let name = input.name.map(str::trim);
    if let Some(name) = name {
        if name.is_empty() {
            issues.push(FieldIssue::new("name", "Name may not be blank"));
        } else if name.chars().count() > RECIPE_NAME_MAX_LEN {
            issues.push(FieldIssue::new(
                "name",
                format!("Name must be at most {RECIPE_NAME_MAX_LEN} characters"),
            ));
        }
    }

    if let Some(text) = input.text {
        if text.trim().is_empty() {
            issues.push(FieldIssue::new("text", "Description may not be blank"));
        }
    }

    let cooking_time = input.cooking_time.and_then(|minutes| {
        if minutes < MIN_COOKING_TIME {
            issues.push(FieldIssue::new(
                "cooking_time",
                format!("Cooking time must be at least {MIN_COOKING_TIME} minute"),
            ));
            None
        } else if minutes > MAX_COOKING_TIME {
            issues.push(FieldIssue::new(
                "cooking_time",
                format!("Cooking time must be at most {MAX_COOKING_TIME} minutes"),
            ));
            None
        } else {
            u32::try_from(minutes).ok()
        }
    });

    let lines = validate_lines(input.ingredients, known_ingredients, &mut issues);
    let tags = validate_tags(input.tags, known_tags, &mut issues);

    if !issues.is_empty() {
        return Err(issues);
    }

    Ok(ValidatedRecipe {
        name: name.map(str::to_owned),
        text: input.text.map(str::to_owned),
        cooking_time,
        lines,
        tags,
    })
}

fn validate_lines(
    ingredients: &[IngredientAmount],
    known: &HashMap<Uuid, Ingredient>,
    issues: &mut Vec<FieldIssue>,
) -> Vec<(Uuid, u32)> {
    if ingredients.is_empty() {
        issues.push(FieldIssue::new("ingredients", "At least one ingredient is required"));
        return Vec::new();
    }

    let mut seen = HashSet::with_capacity(ingredients.len());
    let mut reported_duplicates = HashSet::new();
    let mut lines = Vec::with_capacity(ingredients.len());

    for line in ingredients {
        let Some(ingredient) = known.get(&line.ingredient_id) else {
            issues.push(FieldIssue::new(
                "ingredients",
                format!("Ingredient {} does not exist", line.ingredient_id),
            ));
            continue;
        };

        if !seen.insert(line.ingredient_id) {
            if reported_duplicates.insert(line.ingredient_id) {
                issues.push(FieldIssue::new(
                    "ingredients",
                    format!("Ingredient '{}' is listed more than once", ingredient.name),
                ));
            }
            continue;
        }

        if line.amount < MIN_INGREDIENT_AMOUNT {
            issues.push(FieldIssue::new(
                "ingredients",
                format!(
                    "Amount of '{}' must be at least {MIN_INGREDIENT_AMOUNT}",
                    ingredient.name
                ),
            ));
        } else if line.amount > MAX_INGREDIENT_AMOUNT {
            issues.push(FieldIssue::new(
                "ingredients",
                format!(
                    "Amount of '{}' must be at most {MAX_INGREDIENT_AMOUNT}",
                    ingredient.name
                ),
            ));
        } else if let Ok(amount) = u32::try_from(line.amount) {
            lines.push((line.ingredient_id, amount));
        }
    }

    lines
}

fn validate_tags(
    tags: &[Uuid],
    known: &HashSet<Uuid>,
    issues: &mut Vec<FieldIssue>,
) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(tags.len());
    let mut distinct = Vec::with_capacity(tags.len());
    for tag_id in tags {
        if !seen.insert(*tag_id) {
            continue;
        }
        if known.contains(tag_id) {
            distinct.push(*tag_id);
        } else {
            issues.push(FieldIssue::new("tags", format!("Tag {tag_id} does not exist")));
        }
    }
    distinct
}

/// Writes a recipe, its ingredient lines, and its tag links as one unit
pub struct RecipeWriter {
    pool: SqlitePool,
}

impl RecipeWriter {
    /// Create a writer over the shared pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a recipe authored by `author`
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` with every field issue when validation fails
    /// (nothing is written), or a database error; any failure rolls back
    pub async fn create(&self, author: &User, draft: &RecipeDraft) -> AppResult<Recipe> {
        let mut tx = begin_write(&self.pool).await?;

        let validated = Self::validate(&mut tx, draft.into()).await?;
        let (Some(name), Some(text), Some(cooking_time)) =
            (&validated.name, &validated.text, validated.cooking_time)
        else {
            return Err(AppError::internal("Validated draft is missing required fields"));
        };

        let recipe_id = Uuid::new_v4();
        RecipesManager::insert_recipe(
            &mut tx,
            recipe_id,
            author.id,
            name,
            text,
            cooking_time,
            Utc::now(),
        )
        .await?;
        RecipesManager::replace_lines(&mut tx, recipe_id, &validated.lines).await?;
        RecipesManager::replace_tags(&mut tx, recipe_id, &validated.tags).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe: {e}")))?;

        info!(
            recipe_id = %recipe_id,
            author_id = %author.id,
            ingredients = validated.lines.len(),
            tags = validated.tags.len(),
            "Recipe created"
        );
        self.reload(recipe_id).await
    }

    /// Update a recipe, replacing its ingredient lines and tags wholesale
    ///
    /// Permission checks are the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown recipe, `INVALID_INPUT` with
    /// every field issue when validation fails, or a database error; any
    /// failure rolls back
    pub async fn update(&self, recipe_id: Uuid, update: &RecipeUpdate) -> AppResult<Recipe> {
        let mut tx = begin_write(&self.pool).await?;

        if !RecipesManager::exists(&mut tx, recipe_id).await? {
            return Err(AppError::not_found("Recipe"));
        }

        let validated = Self::validate(&mut tx, update.into()).await?;

        RecipesManager::update_fields(
            &mut tx,
            recipe_id,
            validated.name.as_deref(),
            validated.text.as_deref(),
            validated.cooking_time,
        )
        .await?;
        RecipesManager::replace_lines(&mut tx, recipe_id, &validated.lines).await?;
        RecipesManager::replace_tags(&mut tx, recipe_id, &validated.tags).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe update: {e}")))?;

        info!(
            recipe_id = %recipe_id,
            ingredients = validated.lines.len(),
            tags = validated.tags.len(),
            "Recipe updated"
        );
        self.reload(recipe_id).await
    }

    async fn validate(
        conn: &mut SqliteConnection,
        input: RecipeInput<'_>,
    ) -> AppResult<ValidatedRecipe> {
        let ingredient_ids: Vec<Uuid> = input.ingredients.iter().map(|l| l.ingredient_id).collect();
        let known_ingredients = IngredientsManager::find_many(conn, &ingredient_ids).await?;
        let known_tags = RecipesManager::existing_tag_ids(conn, input.tags).await?;

        validate_recipe(input, &known_ingredients, &known_tags).map_err(AppError::validation)
    }

    async fn reload(&self, recipe_id: Uuid) -> AppResult<Recipe> {
        RecipesManager::new(self.pool.clone())
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Recipe {recipe_id} vanished after write")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str, unit: &str) -> Ingredient {
        Ingredient {
            id: Uuid::new_v4(),
            name: name.into(),
            measurement_unit: unit.into(),
        }
    }

    fn catalog(items: &[&Ingredient]) -> HashMap<Uuid, Ingredient> {
        items.iter().map(|i| (i.id, (*i).clone())).collect()
    }

    #[test]
    fn test_valid_input_passes() {
        let flour = ingredient("flour", "g");
        let eggs = ingredient("eggs", "pcs");
        let tag = Uuid::new_v4();
        let lines = [IngredientAmount::new(flour.id, 200), IngredientAmount::new(eggs.id, 2)];
        let tags = [tag, tag];

        let validated = validate_recipe(
            RecipeInput {
                name: Some("  Pancakes "),
                text: Some("Mix and fry"),
                cooking_time: Some(15),
                ingredients: &lines,
                tags: &tags,
            },
            &catalog(&[&flour, &eggs]),
            &HashSet::from([tag]),
        )
        .unwrap();

        assert_eq!(validated.name.as_deref(), Some("Pancakes"));
        assert_eq!(validated.cooking_time, Some(15));
        assert_eq!(validated.lines, vec![(flour.id, 200), (eggs.id, 2)]);
        assert_eq!(validated.tags, vec![tag]);
    }

    #[test]
    fn test_amount_and_duplicate_reported_by_name() {
        let flour = ingredient("flour", "g");
        let salt = ingredient("salt", "g");
        let lines = [
            IngredientAmount::new(flour.id, 100),
            IngredientAmount::new(flour.id, 50),
            IngredientAmount::new(salt.id, 0),
        ];

        let issues = validate_recipe(
            RecipeInput {
                name: Some("Bread"),
                text: Some("Bake"),
                cooking_time: Some(0),
                ingredients: &lines,
                tags: &[],
            },
            &catalog(&[&flour, &salt]),
            &HashSet::new(),
        )
        .unwrap_err();

        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("at least 1 minute")));
        assert!(messages.iter().any(|m| m.contains("'flour' is listed more than once")));
        assert!(messages.iter().any(|m| m.contains("Amount of 'salt'")));
    }

    #[test]
    fn test_empty_ingredients_and_unknown_ids() {
        let issues = validate_recipe(
            RecipeInput {
                name: Some(""),
                text: Some(" "),
                cooking_time: Some(10),
                ingredients: &[],
                tags: &[Uuid::new_v4()],
            },
            &HashMap::new(),
            &HashSet::new(),
        )
        .unwrap_err();

        let fields: Vec<_> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "text", "ingredients", "tags"]);

        let ghost = Uuid::new_v4();
        let lines = [IngredientAmount::new(ghost, 5)];
        let issues = validate_recipe(
            RecipeInput {
                name: None,
                text: None,
                cooking_time: None,
                ingredients: &lines,
                tags: &[],
            },
            &HashMap::new(),
            &HashSet::new(),
        )
        .unwrap_err();
        assert!(issues[0].message.contains(&ghost.to_string()));
    }

    #[test]
    fn test_update_leaves_missing_scalars_untouched() {
        let flour = ingredient("flour", "g");
        let lines = [IngredientAmount::new(flour.id, 1)];
        let validated = validate_recipe(
            RecipeInput {
                name: None,
                text: None,
                cooking_time: None,
                ingredients: &lines,
                tags: &[],
            },
            &catalog(&[&flour]),
            &HashSet::new(),
        )
        .unwrap();
        assert_eq!(validated.name, None);
        assert_eq!(validated.cooking_time, None);
        assert_eq!(validated.lines.len(), 1);
    }
}

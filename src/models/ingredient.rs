//! Ingredients and per-recipe ingredient amounts.

use serde::{Deserialize, Serialize};

/// Ingredient row; also its wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// Ingredient as read from a loader CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// One ingredient line of a recipe (`ingredient_amounts` joined with
/// `ingredients`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngredientLine {
    /// Ingredient id, not the amount row id
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Aggregated shopping-list entry.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShoppingListRow {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Query filters for the ingredient and recipe listings.
//!
//! Request parameters are turned into plain data first (`IngredientFilter`,
//! `RecipeQuery`) and then evaluated by one interpreter each, so the set of
//! supported predicates is closed and visible in a single place.

use crate::models::{Ingredient, RecipeMark};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

/// Columns selected for every recipe listing.
pub(crate) const RECIPE_COLUMNS: &str =
    "r.id, r.name, r.text, r.pub_date, r.author_id, r.image, r.cooking_time";

// ─── Ingredients ─────────────────────────────────────────────

/// Name search over ingredients.
///
/// Matching is case-insensitive on Unicode text; results whose name starts
/// with the query come before those that only contain it, each tier keeping
/// the incoming (name) order. The query is used as given, so only an empty
/// one leaves the list unfiltered; whitespace is matched literally.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientFilter {
    pub name: Option<String>,
}

impl IngredientFilter {
    pub fn new(name: Option<String>) -> Self {
        Self { name }
    }

    /// Apply the filter to ingredients already in default order.
    pub fn apply(&self, ingredients: Vec<Ingredient>) -> Vec<Ingredient> {
        let needle = match self.name.as_deref() {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return ingredients,
        };

        let mut ranked: Vec<(u8, Ingredient)> = ingredients
            .into_iter()
            .filter_map(|ingredient| {
                let name = ingredient.name.to_lowercase();
                if name.starts_with(&needle) {
                    Some((1, ingredient))
                } else if name.contains(&needle) {
                    Some((2, ingredient))
                } else {
                    None
                }
            })
            .collect();

        // Stable: ties keep name order.
        ranked.sort_by_key(|(tier, _)| *tier);
        ranked.into_iter().map(|(_, ingredient)| ingredient).collect()
    }
}

// ─── Recipes ─────────────────────────────────────────────────

/// One recipe restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipePredicate {
    /// Exact recipe name
    Name(String),
    /// Recipes written by this user
    Author(i64),
    /// Recipes carrying at least one of these tag slugs
    AnyTag(Vec<String>),
    /// Recipes this user has marked (favorite or cart)
    MarkedBy(RecipeMark, i64),
    /// Matches nothing
    Nothing,
}

/// Raw recipe listing parameters, as they arrive on the query string.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilterParams {
    pub name: Option<String>,
    pub author: Option<i64>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// A conjunction of predicates over recipes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    predicates: Vec<RecipePredicate>,
}

impl RecipeQuery {
    /// Build the query for `params` as seen by `viewer`.
    ///
    /// The favorite/cart flags only ever narrow the listing. An anonymous
    /// viewer has marked nothing, so a set flag yields no recipes for them.
    pub fn from_params(params: &RecipeFilterParams, viewer: Option<i64>) -> Self {
        let mut predicates = Vec::new();

        if let Some(name) = params.name.as_ref().filter(|n| !n.is_empty()) {
            predicates.push(RecipePredicate::Name(name.clone()));
        }
        if let Some(author) = params.author {
            predicates.push(RecipePredicate::Author(author));
        }
        if !params.tags.is_empty() {
            predicates.push(RecipePredicate::AnyTag(params.tags.clone()));
        }
        for (wanted, mark) in [
            (params.is_favorited, RecipeMark::Favorite),
            (params.is_in_shopping_cart, RecipeMark::ShoppingCart),
        ] {
            if wanted {
                predicates.push(match viewer {
                    Some(user_id) => RecipePredicate::MarkedBy(mark, user_id),
                    None => RecipePredicate::Nothing,
                });
            }
        }

        Self { predicates }
    }

    pub fn predicates(&self) -> &[RecipePredicate] {
        &self.predicates
    }

    /// Render as a `SELECT` over `recipes r`, newest first.
    pub fn to_sql(&self) -> QueryBuilder<'_, Sqlite> {
        let mut builder = QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r"));

        for (index, predicate) in self.predicates.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });
            push_predicate(&mut builder, predicate);
        }

        builder.push(" ORDER BY r.pub_date DESC, r.id DESC");
        builder
    }
}

fn push_predicate<'a>(builder: &mut QueryBuilder<'a, Sqlite>, predicate: &'a RecipePredicate) {
    match predicate {
        RecipePredicate::Name(name) => {
            builder.push("r.name = ").push_bind(name.as_str());
        }
        RecipePredicate::Author(author_id) => {
            builder.push("r.author_id = ").push_bind(*author_id);
        }
        RecipePredicate::AnyTag(slugs) => {
            builder.push(
                "EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.slug IN (",
            );
            let mut list = builder.separated(", ");
            for slug in slugs {
                list.push_bind(slug.as_str());
            }
            list.push_unseparated("))");
        }
        RecipePredicate::MarkedBy(mark, user_id) => {
            builder
                .push(format!(
                    "EXISTS (SELECT 1 FROM {} m WHERE m.recipe_id = r.id AND m.user_id = ",
                    mark.table()
                ))
                .push_bind(*user_id)
                .push(")");
        }
        RecipePredicate::Nothing => {
            builder.push("0");
        }
    }
}

/// Interpret a boolean filter value the way HTML forms send them.
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::trim),
        Some("1") | Some("true") | Some("True") | Some("on")
    )
}

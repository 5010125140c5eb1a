// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe payloads and projections.

use super::user::UserResponse;
use crate::error::{FieldErrors, Result};
use crate::models::{IngredientLine, RecipeDraft, Tag};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

/// One `{id, amount}` entry of a recipe write.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngredientAmountWrite {
    pub id: i64,
    #[validate(range(min = 1, max = 32767, message = "Amount must be a positive number."))]
    pub amount: i64,
}

/// Body of `POST /api/recipes` and `PUT|PATCH /api/recipes/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeWrite {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[validate(range(min = 1, max = 32767, message = "Cooking time must be a positive number of minutes."))]
    pub cooking_time: i64,
    /// Base64 image, optionally as a `data:` URL
    #[serde(default)]
    pub image: Option<String>,
    #[validate(length(min = 1, message = "At least one ingredient is required."), nested)]
    pub ingredients: Vec<IngredientAmountWrite>,
    #[validate(length(min = 1, message = "At least one tag is required."))]
    pub tags: Vec<i64>,
}

impl RecipeWrite {
    /// Take the image payload out, treating blank strings as absent.
    pub fn take_image(&mut self) -> Option<String> {
        self.image.take().filter(|image| !image.trim().is_empty())
    }

    /// Check cross-item rules and convert into a draft without an image.
    pub fn into_draft(self) -> Result<RecipeDraft> {
        let mut errors = FieldErrors::default();

        let mut seen = HashSet::new();
        for item in &self.ingredients {
            if !seen.insert(item.id) {
                errors.add(
                    "ingredients",
                    format!("Ingredient {} is listed more than once.", item.id),
                );
            }
        }
        errors.into_result()?;

        let mut tag_ids = Vec::with_capacity(self.tags.len());
        for tag_id in self.tags {
            if !tag_ids.contains(&tag_id) {
                tag_ids.push(tag_id);
            }
        }

        Ok(RecipeDraft {
            name: self.name,
            text: self.text,
            cooking_time: self.cooking_time,
            image: None,
            ingredients: self
                .ingredients
                .into_iter()
                .map(|item| (item.id, item.amount))
                .collect(),
            tag_ids,
        })
    }
}

/// Full recipe representation returned by list/retrieve/create/update.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<IngredientLine>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
}

/// Short recipe form used by favorites, cart and subscriptions.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeMinified {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

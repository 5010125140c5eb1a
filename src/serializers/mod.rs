// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wire representations: validated request payloads and response
//! projections.
//!
//! Response projections depend on who is looking (`is_favorited`,
//! `is_in_shopping_cart`, `is_subscribed`), so they are built through a
//! `RenderContext` that carries the viewer.

pub mod recipe;
pub mod user;

pub use recipe::{IngredientAmountWrite, RecipeMinified, RecipeResponse, RecipeWrite};
pub use user::{
    SetPasswordRequest, SubscriptionResponse, TokenLoginRequest, TokenResponse, UserCreate,
    UserResponse,
};

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Recipe, RecipeMark, User};
use crate::AppState;

/// Everything a projection needs to know about the current request.
pub struct RenderContext<'a> {
    db: &'a Database,
    media_url: &'a str,
    viewer: Option<i64>,
}

impl<'a> RenderContext<'a> {
    pub fn new(state: &'a AppState, viewer: Option<AuthUser>) -> Self {
        Self {
            db: &state.db,
            media_url: &state.config.media_url,
            viewer: viewer.map(|user| user.user_id),
        }
    }

    /// Public URL of a stored media file; empty when nothing is stored.
    pub fn image_url(&self, path: &str) -> String {
        if path.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.media_url, path)
        }
    }

    pub async fn user(&self, user: &User) -> Result<UserResponse> {
        let is_subscribed = match self.viewer {
            Some(viewer) => self.db.is_subscribed(viewer, user.id).await?,
            None => false,
        };
        Ok(UserResponse::from_user(user, is_subscribed))
    }

    /// User projection extended with the author's recipes.
    pub async fn subscription(
        &self,
        author: &User,
        recipes_limit: Option<u32>,
    ) -> Result<SubscriptionResponse> {
        let recipes = self.db.recipes_by_author(author.id, recipes_limit).await?;
        Ok(SubscriptionResponse {
            user: self.user(author).await?,
            recipes: recipes.iter().map(|r| self.minified(r)).collect(),
            recipes_count: self.db.count_recipes_by(author.id).await?,
        })
    }

    pub fn minified(&self, recipe: &Recipe) -> RecipeMinified {
        RecipeMinified {
            id: recipe.id,
            name: recipe.name.clone(),
            image: self.image_url(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }

    pub async fn recipe(&self, recipe: &Recipe) -> Result<RecipeResponse> {
        let author = self.db.get_user(recipe.author_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Author {} not found", recipe.author_id))
        })?;

        let (is_favorited, is_in_shopping_cart) = match self.viewer {
            Some(viewer) => (
                self.db
                    .is_marked(RecipeMark::Favorite, recipe.id, viewer)
                    .await?,
                self.db
                    .is_marked(RecipeMark::ShoppingCart, recipe.id, viewer)
                    .await?,
            ),
            None => (false, false),
        };

        Ok(RecipeResponse {
            id: recipe.id,
            tags: self.db.recipe_tags(recipe.id).await?,
            author: self.user(&author).await?,
            ingredients: self.db.recipe_ingredients(recipe.id).await?,
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name.clone(),
            image: self.image_url(&recipe.image),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
        })
    }

    pub async fn recipes(&self, recipes: &[Recipe]) -> Result<Vec<RecipeResponse>> {
        let mut rendered = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            rendered.push(self.recipe(recipe).await?);
        }
        Ok(rendered)
    }
}

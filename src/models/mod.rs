// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;

pub use ingredient::{Ingredient, IngredientLine, NewIngredient, ShoppingListRow};
pub use recipe::{Recipe, RecipeDraft, RecipeMark};
pub use tag::Tag;
pub use user::{NewUser, User};

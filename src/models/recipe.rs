//! Recipe model and the write-side draft used by create/update.

use chrono::{DateTime, Utc};

/// Recipe row stored in the `recipes` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub text: String,
    /// Set on insert, never updated
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    /// Path relative to the media root; empty when no image was stored
    pub image: String,
    pub cooking_time: i64,
}

/// Validated recipe contents ready to be written.
///
/// `image` is `None` on updates that keep the stored image.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub image: Option<String>,
    /// `(ingredient_id, amount)` pairs
    pub ingredients: Vec<(i64, i64)>,
    pub tag_ids: Vec<i64>,
}

/// Per-user recipe markings backed by a (recipe, user) join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeMark {
    Favorite,
    ShoppingCart,
}

impl RecipeMark {
    pub(crate) fn table(self) -> &'static str {
        match self {
            RecipeMark::Favorite => "favorites",
            RecipeMark::ShoppingCart => "shopping_cart",
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe operations.
//!
//! Create and update write the recipe row, its ingredient amounts and its tag
//! links inside a single transaction. Any error returned before `commit`
//! drops the transaction, which rolls every statement back.

use super::Database;
use crate::error::{AppError, FieldErrors};
use crate::filters::{RecipeQuery, RECIPE_COLUMNS};
use crate::models::{IngredientLine, Recipe, RecipeDraft, RecipeMark, ShoppingListRow, Tag};
use sqlx::SqliteConnection;

const DUPLICATE_NAME: &str = "You already have a recipe with this name.";

impl Database {
    // ─── Reads ───────────────────────────────────────────────────

    pub async fn list_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, AppError> {
        let mut builder = query.to_sql();
        Ok(builder
            .build_query_as::<Recipe>()
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_recipe(&self, recipe_id: i64) -> Result<Option<Recipe>, AppError> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = ?");
        Ok(sqlx::query_as::<_, Recipe>(&sql)
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Recipes by `author_id`, newest first, at most `limit` of them.
    pub async fn recipes_by_author(
        &self,
        author_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<Recipe>, AppError> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.author_id = ? \
             ORDER BY r.pub_date DESC, r.id DESC LIMIT ?"
        );
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map(i64::from).unwrap_or(-1);
        Ok(sqlx::query_as::<_, Recipe>(&sql)
            .bind(author_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn count_recipes_by(&self, author_id: i64) -> Result<i64, AppError> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = ?")
                .bind(author_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    pub async fn recipe_tags(&self, recipe_id: i64) -> Result<Vec<Tag>, AppError> {
        Ok(sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.color, t.slug FROM tags t \
             JOIN recipe_tags rt ON rt.tag_id = t.id \
             WHERE rt.recipe_id = ? ORDER BY t.id",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn recipe_ingredients(&self, recipe_id: i64) -> Result<Vec<IngredientLine>, AppError> {
        Ok(sqlx::query_as::<_, IngredientLine>(
            "SELECT i.id, i.name, i.measurement_unit, ia.amount FROM ingredient_amounts ia \
             JOIN ingredients i ON i.id = ia.ingredient_id \
             WHERE ia.recipe_id = ? ORDER BY ia.id",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?)
    }

    // ─── Writes ──────────────────────────────────────────────────

    /// Create a recipe with its ingredient amounts and tags, atomically.
    pub async fn create_recipe(
        &self,
        author_id: i64,
        draft: &RecipeDraft,
    ) -> Result<Recipe, AppError> {
        let mut tx = self.pool.begin().await?;

        ensure_unique_name(&mut tx, author_id, &draft.name, None).await?;

        let sql = format!(
            "INSERT INTO recipes (name, text, pub_date, author_id, image, cooking_time) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {}",
            RECIPE_COLUMNS.replace("r.", "")
        );
        let recipe = sqlx::query_as::<_, Recipe>(&sql)
            .bind(&draft.name)
            .bind(&draft.text)
            .bind(chrono::Utc::now())
            .bind(author_id)
            .bind(draft.image.as_deref().unwrap_or_default())
            .bind(draft.cooking_time)
            .fetch_one(&mut *tx)
            .await
            .map_err(name_conflict)?;

        write_links(&mut tx, recipe.id, draft).await?;

        tx.commit().await?;
        tracing::info!(recipe_id = recipe.id, author_id, "Recipe created");
        Ok(recipe)
    }

    /// Replace a recipe's fields, ingredient amounts and tags, atomically.
    ///
    /// Existing links are deleted and rebuilt from `draft`; nothing is
    /// merged. `pub_date` and `author_id` are never changed, and the stored
    /// image is kept when `draft.image` is `None`.
    pub async fn update_recipe(
        &self,
        recipe_id: i64,
        author_id: i64,
        draft: &RecipeDraft,
    ) -> Result<Recipe, AppError> {
        let mut tx = self.pool.begin().await?;

        ensure_unique_name(&mut tx, author_id, &draft.name, Some(recipe_id)).await?;

        let sql = format!(
            "UPDATE recipes SET name = ?, text = ?, cooking_time = ?, image = COALESCE(?, image) \
             WHERE id = ? RETURNING {}",
            RECIPE_COLUMNS.replace("r.", "")
        );
        let recipe = sqlx::query_as::<_, Recipe>(&sql)
            .bind(&draft.name)
            .bind(&draft.text)
            .bind(draft.cooking_time)
            .bind(draft.image.as_deref())
            .bind(recipe_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(name_conflict)?
            .ok_or_else(|| AppError::NotFound(format!("Recipe {} not found", recipe_id)))?;

        sqlx::query("DELETE FROM ingredient_amounts WHERE recipe_id = ?")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;

        write_links(&mut tx, recipe_id, draft).await?;

        tx.commit().await?;
        tracing::info!(recipe_id, author_id, "Recipe updated");
        Ok(recipe)
    }

    /// Delete a recipe; amounts, tag links and markings cascade.
    pub async fn delete_recipe(&self, recipe_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Favorites / Shopping cart ───────────────────────────────

    /// Mark a recipe for a user. Already marked is a no-op.
    pub async fn mark_recipe(
        &self,
        mark: RecipeMark,
        recipe_id: i64,
        user_id: i64,
    ) -> Result<bool, AppError> {
        let sql = format!(
            "INSERT INTO {} (recipe_id, user_id) VALUES (?, ?) \
             ON CONFLICT (recipe_id, user_id) DO NOTHING",
            mark.table()
        );
        let result = sqlx::query(&sql)
            .bind(recipe_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Remove a user's mark. Not marked is a no-op.
    pub async fn unmark_recipe(
        &self,
        mark: RecipeMark,
        recipe_id: i64,
        user_id: i64,
    ) -> Result<bool, AppError> {
        let sql = format!(
            "DELETE FROM {} WHERE recipe_id = ? AND user_id = ?",
            mark.table()
        );
        let result = sqlx::query(&sql)
            .bind(recipe_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn is_marked(
        &self,
        mark: RecipeMark,
        recipe_id: i64,
        user_id: i64,
    ) -> Result<bool, AppError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE recipe_id = ? AND user_id = ?)",
            mark.table()
        );
        let found: i64 = sqlx::query_scalar(&sql)
            .bind(recipe_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found != 0)
    }

    /// Sum of ingredient amounts over every recipe in the user's cart,
    /// grouped by ingredient name and unit.
    pub async fn shopping_list(&self, user_id: i64) -> Result<Vec<ShoppingListRow>, AppError> {
        Ok(sqlx::query_as::<_, ShoppingListRow>(
            "SELECT i.name AS name, i.measurement_unit AS measurement_unit, \
                    SUM(ia.amount) AS total \
             FROM shopping_cart sc \
             JOIN ingredient_amounts ia ON ia.recipe_id = sc.recipe_id \
             JOIN ingredients i ON i.id = ia.ingredient_id \
             WHERE sc.user_id = ? \
             GROUP BY i.name, i.measurement_unit \
             ORDER BY i.name, i.measurement_unit",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

/// Reject a name the author already uses on another recipe.
async fn ensure_unique_name(
    conn: &mut SqliteConnection,
    author_id: i64,
    name: &str,
    exclude_recipe: Option<i64>,
) -> Result<(), AppError> {
    let taken: i64 = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM recipes \
         WHERE author_id = ? AND name = ? AND (? IS NULL OR id != ?))",
    )
    .bind(author_id)
    .bind(name)
    .bind(exclude_recipe)
    .bind(exclude_recipe)
    .fetch_one(&mut *conn)
    .await?;

    if taken != 0 {
        return Err(AppError::field("name", DUPLICATE_NAME));
    }
    Ok(())
}

/// A concurrent writer can still win the race past `ensure_unique_name`;
/// the unique constraint then reports it and it gets the same message.
fn name_conflict(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(e) if e.is_unique_violation() => {
            AppError::field("name", DUPLICATE_NAME)
        }
        other => other.into(),
    }
}

/// Insert ingredient amounts and tag links for `recipe_id`.
///
/// Rows are inserted only when the referenced ingredient/tag exists; ids that
/// matched nothing are collected into one validation error.
async fn write_links(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    draft: &RecipeDraft,
) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();

    for (ingredient_id, amount) in &draft.ingredients {
        let result = sqlx::query(
            "INSERT INTO ingredient_amounts (recipe_id, ingredient_id, amount) \
             SELECT ?, id, ? FROM ingredients WHERE id = ?",
        )
        .bind(recipe_id)
        .bind(amount)
        .bind(ingredient_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            errors.add(
                "ingredients",
                format!("Invalid pk \"{}\" - object does not exist.", ingredient_id),
            );
        }
    }

    for tag_id in &draft.tag_ids {
        let result = sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id) SELECT ?, id FROM tags WHERE id = ?",
        )
        .bind(recipe_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            errors.add(
                "tags",
                format!("Invalid pk \"{}\" - object does not exist.", tag_id),
            );
        }
    }

    errors.into_result()
}

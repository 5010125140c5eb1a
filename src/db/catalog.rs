// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ingredient and tag operations.

use super::Database;
use crate::error::AppError;
use crate::models::{Ingredient, NewIngredient, Tag};
use sqlx::{QueryBuilder, Sqlite};

impl Database {
    // ─── Tags ────────────────────────────────────────────────────

    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        Ok(
            sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    pub async fn get_tag(&self, tag_id: i64) -> Result<Option<Tag>, AppError> {
        Ok(
            sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags WHERE id = ?")
                .bind(tag_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Slugs from `slugs` that no tag carries.
    pub async fn unknown_tag_slugs(&self, slugs: &[String]) -> Result<Vec<String>, AppError> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT slug FROM tags WHERE slug IN (");
        let mut list = builder.separated(", ");
        for slug in slugs {
            list.push_bind(slug.as_str());
        }
        list.push_unseparated(")");

        let known: Vec<String> = builder
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await?;

        Ok(slugs
            .iter()
            .filter(|slug| !known.contains(slug))
            .cloned()
            .collect())
    }

    // ─── Ingredients ─────────────────────────────────────────────

    /// All ingredients in default (name) order.
    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, AppError> {
        Ok(sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredients ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn get_ingredient(&self, ingredient_id: i64) -> Result<Option<Ingredient>, AppError> {
        Ok(sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredients WHERE id = ?",
        )
        .bind(ingredient_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn count_ingredients(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM ingredients")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Insert ingredients in one transaction, skipping names that already
    /// exist. With `replace_existing` the table is emptied first, inside the
    /// same transaction, so a failure leaves the old rows in place.
    pub async fn import_ingredients(
        &self,
        rows: &[NewIngredient],
        replace_existing: bool,
    ) -> Result<IngredientImport, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut import = IngredientImport::default();

        if replace_existing {
            // Fails while any recipe still references an ingredient.
            import.removed = sqlx::query("DELETE FROM ingredients")
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        for row in rows {
            let result = sqlx::query(
                "INSERT INTO ingredients (name, measurement_unit) VALUES (?, ?) \
                 ON CONFLICT (name) DO NOTHING",
            )
            .bind(&row.name)
            .bind(&row.measurement_unit)
            .execute(&mut *tx)
            .await?;
            import.inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(import)
    }
}

/// Row counts from `import_ingredients`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngredientImport {
    pub removed: u64,
    pub inserted: u64,
}

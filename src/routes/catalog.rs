// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only tag and ingredient routes.

use crate::error::{AppError, Result};
use crate::filters::IngredientFilter;
use crate::models::{Ingredient, Tag};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tags", get(list_tags))
        .route("/api/tags/{id}", get(get_tag))
        .route("/api/ingredients", get(list_ingredients))
        .route("/api/ingredients/{id}", get(get_ingredient))
}

async fn list_tags(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Tag>>> {
    Ok(Json(state.db.list_tags().await?))
}

async fn get_tag(
    State(state): State<Arc<AppState>>,
    Path(tag_id): Path<i64>,
) -> Result<Json<Tag>> {
    state
        .db
        .get_tag(tag_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", tag_id)))
}

/// Ingredients ordered by name; `?name=` ranks prefix matches first.
async fn list_ingredients(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<IngredientFilter>,
) -> Result<Json<Vec<Ingredient>>> {
    let all = state.db.list_ingredients().await?;
    Ok(Json(filter.apply(all)))
}

async fn get_ingredient(
    State(state): State<Arc<AppState>>,
    Path(ingredient_id): Path<i64>,
) -> Result<Json<Ingredient>> {
    state
        .db
        .get_ingredient(ingredient_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Ingredient {} not found", ingredient_id)))
}

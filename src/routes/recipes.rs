// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe routes: CRUD, favorites, shopping cart and shopping-list export.

use crate::error::{AppError, Result};
use crate::extract::ValidJson;
use crate::filters::{parse_flag, RecipeFilterParams, RecipeQuery};
use crate::middleware::auth::AuthUser;
use crate::models::{Recipe, RecipeMark};
use crate::serializers::{RecipeMinified, RecipeResponse, RecipeWrite, RenderContext};
use crate::services::images::ImageError;
use crate::services::shopping_list;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::Query;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/download_shopping_cart",
            get(download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}",
            get(get_recipe)
                .put(update_recipe)
                .patch(update_recipe)
                .delete(delete_recipe),
        )
        .route(
            "/api/recipes/{id}/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart",
            post(add_to_shopping_cart).delete(remove_from_shopping_cart),
        )
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RecipeListQuery {
    name: Option<String>,
    author: Option<i64>,
    /// Repeated `tags=<slug>` keys
    #[serde(default)]
    tags: Vec<String>,
    is_favorited: Option<String>,
    is_in_shopping_cart: Option<String>,
}

/// List recipes, newest first, narrowed by the query filters.
async fn list_recipes(
    State(state): State<Arc<AppState>>,
    viewer: Option<AuthUser>,
    Query(params): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeResponse>>> {
    let unknown = state.db.unknown_tag_slugs(&params.tags).await?;
    if !unknown.is_empty() {
        return Err(AppError::field(
            "tags",
            format!(
                "Select a valid choice. {} is not one of the available choices.",
                unknown.join(", ")
            ),
        ));
    }

    let filter = RecipeFilterParams {
        name: params.name,
        author: params.author,
        tags: params.tags,
        is_favorited: parse_flag(params.is_favorited.as_deref()),
        is_in_shopping_cart: parse_flag(params.is_in_shopping_cart.as_deref()),
    };
    let query = RecipeQuery::from_params(&filter, viewer.map(|user| user.user_id));

    tracing::debug!(
        viewer = ?viewer.map(|user| user.user_id),
        predicates = ?query.predicates(),
        "Listing recipes"
    );

    let recipes = state.db.list_recipes(&query).await?;
    let ctx = RenderContext::new(&state, viewer);
    Ok(Json(ctx.recipes(&recipes).await?))
}

async fn get_recipe(
    State(state): State<Arc<AppState>>,
    viewer: Option<AuthUser>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<RecipeResponse>> {
    let recipe = load_recipe(&state, recipe_id).await?;
    let ctx = RenderContext::new(&state, viewer);
    Ok(Json(ctx.recipe(&recipe).await?))
}

// ─── Create / Update / Delete ────────────────────────────────

async fn create_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidJson(mut payload): ValidJson<RecipeWrite>,
) -> Result<(StatusCode, Json<RecipeResponse>)> {
    let image = payload
        .take_image()
        .ok_or_else(|| AppError::field("image", "This field is required."))?;
    let mut draft = payload.into_draft()?;
    draft.image = Some(store_image(&state, &image).await?);

    let recipe = state.db.create_recipe(user.user_id, &draft).await?;

    let ctx = RenderContext::new(&state, Some(user));
    Ok((StatusCode::CREATED, Json(ctx.recipe(&recipe).await?)))
}

/// Replace a recipe. Serves both PUT and PATCH; the image may be omitted to
/// keep the current one, everything else is replaced.
async fn update_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
    payload: std::result::Result<ValidJson<RecipeWrite>, AppError>,
) -> Result<Json<RecipeResponse>> {
    // Ownership is checked before the body is looked at.
    let existing = load_recipe(&state, recipe_id).await?;
    ensure_author(&existing, user)?;

    let ValidJson(mut payload) = payload?;
    let image = payload.take_image();
    let mut draft = payload.into_draft()?;
    if let Some(image) = image {
        draft.image = Some(store_image(&state, &image).await?);
    }

    let recipe = state
        .db
        .update_recipe(recipe_id, user.user_id, &draft)
        .await?;

    let ctx = RenderContext::new(&state, Some(user));
    Ok(Json(ctx.recipe(&recipe).await?))
}

async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode> {
    let existing = load_recipe(&state, recipe_id).await?;
    ensure_author(&existing, user)?;

    state.db.delete_recipe(recipe_id).await?;
    tracing::info!(recipe_id, user_id = user.user_id, "Recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Favorites / Shopping cart ───────────────────────────────

async fn add_favorite(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<(StatusCode, Json<RecipeMinified>)> {
    add_mark(&state, RecipeMark::Favorite, recipe_id, user).await
}

async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode> {
    remove_mark(&state, RecipeMark::Favorite, recipe_id, user).await
}

async fn add_to_shopping_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<(StatusCode, Json<RecipeMinified>)> {
    add_mark(&state, RecipeMark::ShoppingCart, recipe_id, user).await
}

async fn remove_from_shopping_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode> {
    remove_mark(&state, RecipeMark::ShoppingCart, recipe_id, user).await
}

/// Adding an existing mark succeeds without change.
async fn add_mark(
    state: &AppState,
    mark: RecipeMark,
    recipe_id: i64,
    user: AuthUser,
) -> Result<(StatusCode, Json<RecipeMinified>)> {
    let recipe = load_recipe(state, recipe_id).await?;
    let added = state.db.mark_recipe(mark, recipe.id, user.user_id).await?;
    tracing::debug!(recipe_id, user_id = user.user_id, ?mark, added, "Recipe marked");

    let ctx = RenderContext::new(state, Some(user));
    Ok((StatusCode::CREATED, Json(ctx.minified(&recipe))))
}

/// Removing a missing mark also answers 204.
async fn remove_mark(
    state: &AppState,
    mark: RecipeMark,
    recipe_id: i64,
    user: AuthUser,
) -> Result<StatusCode> {
    let recipe = load_recipe(state, recipe_id).await?;
    let removed = state.db.unmark_recipe(mark, recipe.id, user.user_id).await?;
    tracing::debug!(recipe_id, user_id = user.user_id, ?mark, removed, "Recipe unmarked");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Shopping list ───────────────────────────────────────────

/// Download the aggregated ingredients of every recipe in the cart.
async fn download_shopping_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Response> {
    let rows = state.db.shopping_list(user.user_id).await?;
    let body = shopping_list::render_csv(&rows)?;

    tracing::debug!(user_id = user.user_id, rows = rows.len(), "Shopping list exported");

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", shopping_list::FILE_NAME),
            ),
        ],
        body,
    )
        .into_response())
}

// ─── Helpers ─────────────────────────────────────────────────

async fn load_recipe(state: &AppState, recipe_id: i64) -> Result<Recipe> {
    state
        .db
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recipe {} not found", recipe_id)))
}

fn ensure_author(recipe: &Recipe, user: AuthUser) -> Result<()> {
    if recipe.author_id == user.user_id {
        Ok(())
    } else {
        tracing::warn!(
            recipe_id = recipe.id,
            user_id = user.user_id,
            "Blocked recipe change by non-author"
        );
        Err(AppError::Forbidden)
    }
}

async fn store_image(state: &AppState, payload: &str) -> Result<String> {
    state.images.save_base64(payload).await.map_err(|err| match err {
        ImageError::Io(e) => AppError::Internal(anyhow::Error::new(e).context("storing image")),
        invalid => AppError::field("image", invalid.to_string()),
    })
}

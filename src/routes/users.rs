// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User routes: registration, profile, password change and subscriptions.

use crate::error::{AppError, FieldErrors, Result};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::models::{NewUser, User};
use crate::serializers::{
    RenderContext, SetPasswordRequest, SubscriptionResponse, UserCreate, UserResponse,
};
use crate::services::password::{self, PasswordContext};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/me", get(me))
        .route("/api/users/set_password", post(set_password))
        .route("/api/users/subscriptions", get(subscriptions))
        .route("/api/users/{id}", get(get_user))
        .route(
            "/api/users/{id}/subscribe",
            post(subscribe).delete(unsubscribe),
        )
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecipesLimitQuery {
    recipes_limit: Option<u32>,
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    viewer: Option<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserResponse>>> {
    let users = state.db.list_users(query.search.as_deref()).await?;

    let ctx = RenderContext::new(&state, viewer);
    let mut rendered = Vec::with_capacity(users.len());
    for user in &users {
        rendered.push(ctx.user(user).await?);
    }
    Ok(Json(rendered))
}

/// Register a new account.
async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let context = PasswordContext {
        username: &payload.username,
        email: &payload.email,
        first_name: &payload.first_name,
        last_name: &payload.last_name,
    };
    check_strength(&state, "password", &payload.password, &context)?;

    let password_hash =
        password::hash_password_blocking(payload.password, state.config.password_hash_iterations)
            .await?;

    let user = state
        .db
        .create_user(&NewUser {
            username: payload.username,
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user, false))))
}

async fn me(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<Json<UserResponse>> {
    let current = load_user(&state, user.user_id).await?;
    let ctx = RenderContext::new(&state, Some(user));
    Ok(Json(ctx.user(&current).await?))
}

/// Profile of any user; only available to signed-in callers.
async fn get_user(
    State(state): State<Arc<AppState>>,
    viewer: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>> {
    let user = load_user(&state, user_id).await?;
    let ctx = RenderContext::new(&state, Some(viewer));
    Ok(Json(ctx.user(&user).await?))
}

async fn set_password(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidJson(payload): ValidJson<SetPasswordRequest>,
) -> Result<StatusCode> {
    let current = load_user(&state, user.user_id).await?;

    let matches = password::verify_password_blocking(
        payload.current_password,
        current.password_hash.clone(),
    )
    .await;
    if !matches {
        tracing::debug!(user_id = user.user_id, "Password change with wrong current password");
        return Err(AppError::field("current_password", "Incorrect password."));
    }

    check_strength(
        &state,
        "new_password",
        &payload.new_password,
        &PasswordContext::from(&current),
    )?;

    let hash = password::hash_password_blocking(
        payload.new_password,
        state.config.password_hash_iterations,
    )
    .await?;
    state.db.set_password_hash(user.user_id, &hash).await?;

    tracing::info!(user_id = user.user_id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Subscriptions ───────────────────────────────────────────

async fn subscriptions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<RecipesLimitQuery>,
) -> Result<Json<Vec<SubscriptionResponse>>> {
    let authors = state.db.subscriptions_of(user.user_id).await?;

    let ctx = RenderContext::new(&state, Some(user));
    let mut rendered = Vec::with_capacity(authors.len());
    for author in &authors {
        rendered.push(ctx.subscription(author, query.recipes_limit).await?);
    }
    Ok(Json(rendered))
}

/// Follow an author. Following oneself is skipped without error.
async fn subscribe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(author_id): Path<i64>,
    Query(query): Query<RecipesLimitQuery>,
) -> Result<(StatusCode, Json<SubscriptionResponse>)> {
    let author = load_user(&state, author_id).await?;

    if author.id == user.user_id {
        tracing::debug!(user_id = user.user_id, "Ignoring self-subscription");
    } else {
        let created = state.db.subscribe(user.user_id, author.id).await?;
        tracing::debug!(user_id = user.user_id, author_id, created, "Subscribed");
    }

    let ctx = RenderContext::new(&state, Some(user));
    Ok((
        StatusCode::CREATED,
        Json(ctx.subscription(&author, query.recipes_limit).await?),
    ))
}

async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(author_id): Path<i64>,
) -> Result<StatusCode> {
    let author = load_user(&state, author_id).await?;
    let removed = state.db.unsubscribe(user.user_id, author.id).await?;
    tracing::debug!(user_id = user.user_id, author_id, removed, "Unsubscribed");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Helpers ─────────────────────────────────────────────────

async fn load_user(state: &AppState, user_id: i64) -> Result<User> {
    state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

fn check_strength(
    state: &AppState,
    field: &str,
    candidate: &str,
    context: &PasswordContext<'_>,
) -> Result<()> {
    let Err(problems) =
        password::validate_strength(candidate, state.config.password_min_length, context)
    else {
        return Ok(());
    };

    let mut errors = FieldErrors::default();
    for problem in problems {
        errors.add(field, problem);
    }
    errors.into_result()
}

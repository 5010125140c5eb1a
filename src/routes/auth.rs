// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token login and logout.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::extract::ValidJson;
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::serializers::{TokenLoginRequest, TokenResponse};
use crate::services::password;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/token/login", post(login))
        .route("/api/auth/token/logout", post(logout))
}

/// Exchange username and password for a signed token.
async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<TokenLoginRequest>,
) -> Result<Json<TokenResponse>> {
    let user = state.db.get_user_by_username(&payload.username).await?;

    let verified = match &user {
        Some(user) => {
            password::verify_password_blocking(payload.password, user.password_hash.clone()).await
        }
        None => false,
    };
    let Some(user) = user.filter(|_| verified) else {
        tracing::info!(username = %payload.username, "Failed login attempt");
        return Err(AppError::field(
            "non_field_errors",
            "Unable to log in with provided credentials.",
        ));
    };

    let auth_token = create_jwt(
        user.id,
        &state.config.jwt_signing_key,
        state.config.token_ttl_hours,
    )?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(TokenResponse { auth_token }))
}

/// Tokens are stateless; the client drops its copy.
async fn logout(user: AuthUser) -> StatusCode {
    tracing::info!(user_id = user.user_id, "User logged out");
    StatusCode::NO_CONTENT
}

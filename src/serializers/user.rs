// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User payloads and projections.

use super::recipe::RecipeMinified;
use crate::models::User;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Base user projection.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer follows this user
    pub is_subscribed: bool,
}

impl UserResponse {
    pub fn from_user(user: &User, is_subscribed: bool) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
        }
    }
}

/// User projection plus the author's recipes, for subscription endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeMinified>,
    pub recipes_count: i64,
}

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(
        length(min = 1, max = 150),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Letters, digits and `@ . + - _` only.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if username.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username").with_message(Cow::Borrowed(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        )))
    }
}

/// Body of `POST /api/users/set_password`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetPasswordRequest {
    #[validate(length(min = 1))]
    pub new_password: String,
    #[validate(length(min = 1))]
    pub current_password: String,
}

/// Body of `POST /api/auth/token/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TokenLoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

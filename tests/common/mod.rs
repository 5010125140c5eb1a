// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
};
use foodgram::config::Config;
use foodgram::middleware::auth::create_jwt;
use foodgram::models::{Ingredient, NewIngredient, NewUser, Tag, User};
use foodgram::routes::create_router;
use foodgram::services::password::hash_password;
use foodgram::AppState;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// 1x1 transparent PNG, base64.
#[allow(dead_code)]
pub const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Password given to every user made by `create_user`.
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "Tr1cky-Soup-Base";

/// Router plus the state behind it. Each app has its own in-memory
/// database and media directory.
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    _media: TempDir,
}

/// Create a test app with a fresh database.
pub async fn create_test_app() -> TestApp {
    let media = tempfile::tempdir().unwrap();
    let mut config = Config::test_default();
    config.media_root = media.path().to_path_buf();

    let state = Arc::new(AppState::new(config).await.unwrap());
    TestApp {
        router: create_router(state.clone()),
        state,
        _media: media,
    }
}

#[allow(dead_code)]
impl TestApp {
    /// Send a request, optionally authenticated and with a JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Like `request`, returning the status and the parsed JSON body
    /// (`Value::Null` for empty bodies).
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, token, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        if bytes.is_empty() {
            return (status, Value::Null);
        }
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Insert a user with `TEST_PASSWORD`.
    pub async fn create_user(&self, username: &str) -> User {
        let password_hash = hash_password(
            TEST_PASSWORD,
            self.state.config.password_hash_iterations,
        )
        .unwrap();
        self.state
            .db
            .create_user(&NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                first_name: "Test".to_string(),
                last_name: "Cook".to_string(),
                password_hash,
            })
            .await
            .unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        create_jwt(user.id, &self.state.config.jwt_signing_key, 1).unwrap()
    }

    /// Insert a user and return it with a token.
    pub async fn signed_in(&self, username: &str) -> (User, String) {
        let user = self.create_user(username).await;
        let token = self.token_for(&user);
        (user, token)
    }

    /// Tags have no write endpoint; insert them directly.
    pub async fn create_tag(&self, name: &str, slug: &str) -> Tag {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, color, slug) VALUES (?, '#E26C2D', ?) \
             RETURNING id, name, color, slug",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(self.state.db.pool())
        .await
        .unwrap()
    }

    pub async fn create_ingredient(&self, name: &str, unit: &str) -> Ingredient {
        self.state
            .db
            .import_ingredients(
                &[NewIngredient {
                    name: name.to_string(),
                    measurement_unit: unit.to_string(),
                }],
                false,
            )
            .await
            .unwrap();
        self.state
            .db
            .list_ingredients()
            .await
            .unwrap()
            .into_iter()
            .find(|ingredient| ingredient.name == name)
            .unwrap()
    }

    /// Create a recipe over HTTP and return its id.
    pub async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        ingredients: &[(i64, i64)],
        tags: &[i64],
    ) -> i64 {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/recipes",
                Some(token),
                Some(recipe_body(name, ingredients, tags)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["id"].as_i64().unwrap()
    }
}

/// JSON body for a recipe write.
#[allow(dead_code)]
pub fn recipe_body(name: &str, ingredients: &[(i64, i64)], tags: &[i64]) -> Value {
    serde_json::json!({
        "name": name,
        "text": "Mix and cook.",
        "cooking_time": 20,
        "image": format!("data:image/png;base64,{}", PIXEL_PNG),
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| serde_json::json!({ "id": id, "amount": amount }))
            .collect::<Vec<_>>(),
        "tags": tags,
    })
}

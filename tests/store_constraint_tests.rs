// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Relational constraints the API relies on.

use axum::http::{Method, StatusCode};

mod common;

use common::create_test_app;

#[tokio::test]
async fn test_author_with_recipes_cannot_be_deleted() {
    let app = create_test_app().await;
    let (anna, token) = app.signed_in("anna").await;
    let flour = app.create_ingredient("flour", "g").await;
    let tag = app.create_tag("Baking", "baking").await;
    let id = app
        .create_recipe(&token, "Bread", &[(flour.id, 500)], &[tag.id])
        .await;
    let pool = app.state.db.pool();

    let blocked = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(anna.id)
        .execute(pool)
        .await;
    assert!(blocked.is_err());

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/recipes/{}", id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(anna.id)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_recipe_delete_cascades_marks_and_links() {
    let app = create_test_app().await;
    let (_, token) = app.signed_in("anna").await;
    let flour = app.create_ingredient("flour", "g").await;
    let tag = app.create_tag("Baking", "baking").await;
    let id = app
        .create_recipe(&token, "Bread", &[(flour.id, 500)], &[tag.id])
        .await;

    for action in ["favorite", "shopping_cart"] {
        let (status, _) = app
            .json(
                Method::POST,
                &format!("/api/recipes/{}/{}", id, action),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/recipes/{}", id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let pool = app.state.db.pool();
    for table in ["ingredient_amounts", "recipe_tags", "favorites", "shopping_cart"] {
        let rows: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(rows, 0, "{} not cleaned up", table);
    }

    // Ingredients stay; deletion is only blocked while referenced.
    assert_eq!(app.state.db.count_ingredients().await.unwrap(), 1);
}

#[tokio::test]
async fn test_referenced_ingredient_is_protected() {
    let app = create_test_app().await;
    let (_, token) = app.signed_in("anna").await;
    let flour = app.create_ingredient("flour", "g").await;
    let tag = app.create_tag("Baking", "baking").await;
    app.create_recipe(&token, "Bread", &[(flour.id, 500)], &[tag.id])
        .await;

    assert!(app.state.db.import_ingredients(&[], true).await.is_err());
    assert_eq!(app.state.db.count_ingredients().await.unwrap(), 1);
}

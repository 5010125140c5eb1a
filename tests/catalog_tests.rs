// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tag and ingredient listings.

use axum::http::{Method, StatusCode};

mod common;

use common::create_test_app;

fn names(body: &serde_json::Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_ingredient_search_ranks_prefix_first() {
    let app = create_test_app().await;
    for name in ["sea salt", "salt", "Salted butter", "sugar", "basalt flakes"] {
        app.create_ingredient(name, "g").await;
    }

    let (status, body) = app
        .json(Method::GET, "/api/ingredients?name=SAL", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    // Within a tier the stored name order (binary collation) is kept.
    assert_eq!(
        names(&body),
        vec!["Salted butter", "salt", "basalt flakes", "sea salt"]
    );

    let (_, body) = app.json(Method::GET, "/api/ingredients", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 5);

    let (_, body) = app
        .json(Method::GET, "/api/ingredients?name=", None, None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 5);
    // A space is searched for like any other character.
    let (_, body) = app
        .json(Method::GET, "/api/ingredients?name=%20", None, None)
        .await;
    assert_eq!(names(&body), vec!["Salted butter", "basalt flakes", "sea salt"]);
}

#[tokio::test]
async fn test_ingredient_search_is_unicode_aware() {
    let app = create_test_app().await;
    app.create_ingredient("Абрикос", "г").await;
    app.create_ingredient("сушёный абрикос", "г").await;
    app.create_ingredient("яблоко", "шт").await;

    let (_, body) = app
        .json(
            Method::GET,
            "/api/ingredients?name=%D0%B0%D0%B1%D1%80",
            None,
            None,
        )
        .await;
    assert_eq!(names(&body), vec!["Абрикос", "сушёный абрикос"]);
}

#[tokio::test]
async fn test_detail_endpoints() {
    let app = create_test_app().await;
    let tag = app.create_tag("Breakfast", "breakfast").await;
    let flour = app.create_ingredient("flour", "g").await;

    let (status, body) = app
        .json(Method::GET, &format!("/api/tags/{}", tag.id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "breakfast");
    assert_eq!(body["color"], "#E26C2D");

    let (status, body) = app
        .json(
            Method::GET,
            &format!("/api/ingredients/{}", flour.id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["measurement_unit"], "g");

    let (status, _) = app.json(Method::GET, "/api/tags/77", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .json(Method::GET, "/api/ingredients/77", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.json(Method::GET, "/api/tags", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let app = create_test_app().await;
    let response = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}

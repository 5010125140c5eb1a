// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request extractors.

use crate::error::AppError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed its `validator` rules.
///
/// Malformed bodies become `BadRequest` and rule violations become
/// field-level `Validation` errors, both 400s. Oversized bodies and a
/// missing JSON content type keep their 413/415 status.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(errors.into()))?;

        Ok(Self(value))
    }
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(rejection.body_text()),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            AppError::UnsupportedMediaType(rejection.body_text())
        }
        _ => AppError::BadRequest(rejection.body_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::DefaultBodyLimit,
        http::{header, Method},
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Note {
        #[validate(length(min = 1))]
        text: String,
    }

    async fn accept(ValidJson(note): ValidJson<Note>) -> String {
        note.text
    }

    async fn post_note(content_type: Option<&str>, body: &str) -> StatusCode {
        let app = Router::new()
            .route("/", post(accept))
            .layer(DefaultBodyLimit::max(64));
        let mut request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/");
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        app.oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_rejection_statuses() {
        let json = Some("application/json");

        assert_eq!(post_note(json, r#"{"text":"hi"}"#).await, StatusCode::OK);
        assert_eq!(post_note(json, r#"{"text":""}"#).await, StatusCode::BAD_REQUEST);
        assert_eq!(post_note(json, "{not json").await, StatusCode::BAD_REQUEST);
        assert_eq!(
            post_note(None, r#"{"text":"hi"}"#).await,
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );

        let long = format!(r#"{{"text":"{}"}}"#, "x".repeat(100));
        assert_eq!(post_note(json, &long).await, StatusCode::PAYLOAD_TOO_LARGE);
    }
}

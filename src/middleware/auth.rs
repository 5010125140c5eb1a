// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token authentication middleware.
//!
//! `authenticate` runs on every request. Without an `Authorization` header
//! the request continues anonymously; with one, the token must be valid or
//! the request is rejected with 401. Handlers then take `AuthUser` (required)
//! or `Option<AuthUser>` (optional) as an extractor.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

/// Accepted `Authorization` schemes.
const SCHEMES: &[&str] = &["Token ", "Bearer "];

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Middleware that attaches `AuthUser` when a valid token is presented.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = token_from_headers(request.headers())? else {
        return Ok(next.run(request).await);
    };

    let user_id = verify_jwt(token, &state.config.jwt_signing_key).map_err(|_| {
        tracing::debug!("Rejected request with invalid token");
        AppError::InvalidToken
    })?;

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}

/// Extract the raw token. `Ok(None)` means no credentials were sent.
fn token_from_headers(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AppError::InvalidToken)?;

    SCHEMES
        .iter()
        .find_map(|scheme| value.strip_prefix(scheme))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or(AppError::InvalidToken)
}

/// Validate a token and return the user ID it was issued for.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> anyhow::Result<i64> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims.sub.parse()?)
}

/// Create a JWT for a user.
pub fn create_jwt(user_id: i64, signing_key: &[u8], ttl_hours: u64) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + (ttl_hours * 60 * 60) as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for AuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const KEY: &[u8] = b"unit_test_signing_key_0123456789";

    #[test]
    fn test_jwt_round_trip() {
        let token = create_jwt(42, KEY, 1).unwrap();
        assert_eq!(verify_jwt(&token, KEY).unwrap(), 42);
        assert!(verify_jwt(&token, b"some_other_signing_key_987654321").is_err());
    }

    #[test]
    fn test_token_schemes() {
        let mut headers = HeaderMap::new();
        assert!(matches!(token_from_headers(&headers), Ok(None)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert!(matches!(token_from_headers(&headers), Ok(Some("abc"))));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert!(matches!(token_from_headers(&headers), Ok(Some("xyz"))));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert!(matches!(
            token_from_headers(&headers),
            Err(AppError::InvalidToken)
        ));
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and shared through `AppState`; nothing reads the
//! environment after that.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "sqlite://foodgram.db?mode=rwc";
const DEFAULT_DATA_DIR: &str = "data";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLx connection string for the SQLite database
    pub database_url: String,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// JWT signing key for auth tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Lifetime of issued auth tokens, in hours
    pub token_ttl_hours: u64,
    /// Directory uploaded images are written to
    pub media_root: PathBuf,
    /// URL prefix under which `media_root` is served
    pub media_url: String,
    /// Minimum accepted password length
    pub password_min_length: usize,
    /// PBKDF2 rounds for newly hashed passwords
    pub password_hash_iterations: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local
    /// development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_url: database_url_from_env(),
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .trim()
                .as_bytes()
                .to_vec(),
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", 24 * 30)?,
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            media_url: normalize_media_url(
                &env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string()),
            ),
            password_min_length: parse_var("PASSWORD_MIN_LENGTH", 8)?,
            password_hash_iterations: parse_var("PASSWORD_HASH_ITERATIONS", 600_000)?,
        })
    }

    /// Config for tests: in-memory database, cheap password hashing.
    pub fn test_default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 8080,
            frontend_url: "http://localhost:3000".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            token_ttl_hours: 24,
            media_root: env::temp_dir().join("foodgram-test-media"),
            media_url: "/media/".to_string(),
            password_min_length: 8,
            password_hash_iterations: 1_000,
        }
    }
}

/// `DATABASE_URL`, for tools that need the store but not the server
/// settings.
pub fn database_url_from_env() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// `DATA_DIR`, the default loader input directory.
pub fn data_dir_from_env() -> PathBuf {
    env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Whether a connection string names an in-memory database.
pub fn is_in_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Media URLs are joined with relative paths, so they always end in `/`.
fn normalize_media_url(raw: &str) -> String {
    if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("MEDIA_URL", "/uploads");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.media_url, "/uploads/");
        assert_eq!(config.password_min_length, 8);
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory_url(&Config::test_default().database_url));
        assert!(is_in_memory_url("sqlite://file:shared?mode=memory&cache=shared"));
        assert!(!is_in_memory_url(DEFAULT_DATABASE_URL));
    }
}

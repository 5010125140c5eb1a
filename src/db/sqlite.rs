// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite pool wrapper with typed operations.
//!
//! The operations themselves live next to their tables:
//! - `users`: accounts and subscriptions
//! - `catalog`: ingredients and tags
//! - `recipes`: recipes, their ingredient/tag links, favorites and cart

use crate::config::{is_in_memory_url, Config};
use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const MAX_CONNECTIONS: u32 = 8;

/// SQLite database client.
#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Open the configured database and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        Self::connect_url(&config.database_url).await
    }

    /// Open the database at `url` and apply pending migrations.
    pub async fn connect_url(url: &str) -> Result<Self, AppError> {
        let in_memory = is_in_memory_url(url);
        let mut options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::Database(format!("Invalid DATABASE_URL: {}", e)))?
            .foreign_keys(true)
            .create_if_missing(true);

        // Each connection to `:memory:` opens its own empty database, so the
        // pool must hold exactly one connection for its whole life.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;

        tracing::info!(in_memory, "Database ready");

        Ok(Self { pool })
    }

    /// Underlying pool, for callers that need raw SQL.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User and subscription operations.

use super::Database;
use crate::error::AppError;
use crate::models::{NewUser, User};

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, password_hash, date_joined";

impl Database {
    // ─── Users ───────────────────────────────────────────────────

    /// Insert a new user. A taken username is reported as a field error.
    pub async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, first_name, last_name, password_hash, date_joined) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .bind(chrono::Utc::now())
            .fetch_one(&self.pool)
            .await;

        match created {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::field(
                "username",
                "A user with that username already exists.",
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// All users ordered by id, optionally narrowed to usernames containing
    /// `search` (case-insensitive).
    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE ?1 IS NULL OR instr(lower(username), lower(?1)) > 0 \
             ORDER BY id"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(search.filter(|s| !s.is_empty()))
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn set_password_hash(&self, user_id: i64, hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Subscriptions ───────────────────────────────────────────

    /// Follow `author_id`. Returns `false` when the row already existed.
    pub async fn subscribe(&self, user_id: i64, author_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO subscriptions (user_id, author_id) VALUES (?, ?) \
             ON CONFLICT (user_id, author_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Stop following `author_id`. Returns `false` when there was no row.
    pub async fn unsubscribe(&self, user_id: i64, author_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn is_subscribed(&self, user_id: i64, author_id: i64) -> Result<bool, AppError> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM subscriptions WHERE user_id = ? AND author_id = ?)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(found != 0)
    }

    /// Authors followed by `user_id`, ordered by id.
    pub async fn subscriptions_of(&self, user_id: i64) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {} FROM users u JOIN subscriptions s ON s.author_id = u.id \
             WHERE s.user_id = ? ORDER BY u.id",
            prefixed_user_columns()
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }
}

fn prefixed_user_columns() -> String {
    USER_COLUMNS
        .split(", ")
        .map(|column| format!("u.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

//! User account model.

use chrono::{DateTime, Utc};

/// User row stored in the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `pbkdf2_sha256$<iterations>$<salt>$<hash>`
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

/// Fields needed to register a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

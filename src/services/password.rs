// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing and strength rules.
//!
//! Hashes use PBKDF2-HMAC-SHA256 with a random 16-byte salt and are stored as
//! `pbkdf2_sha256$<iterations>$<salt>$<hash>` (standard base64 parts), so the
//! round count can change without invalidating stored passwords.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};
use std::num::NonZeroU32;

use crate::models::User;

const ALGORITHM_TAG: &str = "pbkdf2_sha256";
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = digest::SHA256_OUTPUT_LEN;
/// Shortest user attribute considered by the similarity rule.
const MIN_ATTRIBUTE_LEN: usize = 3;

/// Passwords refused outright regardless of length.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "12345678",
    "123456789",
    "1234567890",
    "11111111",
    "abc12345",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "welcome1",
    "letmein1",
    "trustno1",
    "superman",
    "starwars",
    "passw0rd",
    "1q2w3e4r",
    "zaq12wsx",
    "dragon12",
];

/// Hash a password with a fresh salt.
pub fn hash_password(password: &str, iterations: u32) -> anyhow::Result<String> {
    let rounds = NonZeroU32::new(iterations)
        .ok_or_else(|| anyhow::anyhow!("PBKDF2 iteration count must be non-zero"))?;

    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| anyhow::anyhow!("Failed to generate password salt"))?;

    let mut credential = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        rounds,
        &salt,
        password.as_bytes(),
        &mut credential,
    );

    Ok(format!(
        "{}${}${}${}",
        ALGORITHM_TAG,
        rounds,
        STANDARD.encode(salt),
        STANDARD.encode(credential)
    ))
}

/// Check `password` against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(tag), Some(rounds), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if tag != ALGORITHM_TAG {
        return false;
    }
    let Some(rounds) = rounds.parse::<u32>().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (STANDARD.decode(salt), STANDARD.decode(expected)) else {
        return false;
    };

    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        rounds,
        &salt,
        password.as_bytes(),
        &expected,
    )
    .is_ok()
}

/// `hash_password` on the blocking pool.
pub async fn hash_password_blocking(password: String, iterations: u32) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, iterations)).await?
}

/// `verify_password` on the blocking pool. A failed task never verifies.
pub async fn verify_password_blocking(password: String, stored: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .unwrap_or(false)
}

/// User attributes a password must not resemble.
#[derive(Debug, Default)]
pub struct PasswordContext<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

impl<'a> From<&'a User> for PasswordContext<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            username: &user.username,
            email: &user.email,
            first_name: &user.first_name,
            last_name: &user.last_name,
        }
    }
}

/// Apply the strength rules. Returns every rule the password breaks.
pub fn validate_strength(
    password: &str,
    min_length: usize,
    context: &PasswordContext<'_>,
) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if password.chars().count() < min_length {
        problems.push(format!(
            "This password is too short. It must contain at least {} characters.",
            min_length
        ));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        problems.push("This password is too common.".to_string());
    }

    let email_local = context.email.split('@').next().unwrap_or_default();
    let attributes = [
        ("username", context.username),
        ("email address", email_local),
        ("first name", context.first_name),
        ("last name", context.last_name),
    ];
    for (label, value) in attributes {
        let value = value.trim().to_lowercase();
        if value.chars().count() < MIN_ATTRIBUTE_LEN || lowered.is_empty() {
            continue;
        }
        if lowered.contains(&value) || value.contains(&lowered) {
            problems.push(format!("The password is too similar to the {}.", label));
            break;
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse", 1_000).unwrap();

        assert!(hash.starts_with("pbkdf2_sha256$1000$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same", 1_000).unwrap();
        let b = hash_password("same", 1_000).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "md5$1$abc$def"));
        assert!(!verify_password("x", "pbkdf2_sha256$0$AAAA$AAAA"));
        assert!(!verify_password("x", "pbkdf2_sha256$10$not base64$AAAA"));
    }

    #[test]
    fn test_strength_rules() {
        let ctx = PasswordContext {
            username: "chef_anna",
            email: "anna.k@example.com",
            first_name: "Anna",
            last_name: "Karenina",
        };

        assert!(validate_strength("Tr1cky-Soup-Base", 8, &ctx).is_ok());

        let short = validate_strength("Ab1!", 8, &ctx).unwrap_err();
        assert!(short[0].contains("too short"));

        let numeric = validate_strength("93817264", 8, &ctx).unwrap_err();
        assert!(numeric.iter().any(|p| p.contains("entirely numeric")));

        let common = validate_strength("Password123", 8, &ctx).unwrap_err();
        assert!(common.iter().any(|p| p.contains("too common")));

        let similar = validate_strength("karenina-2024", 8, &ctx).unwrap_err();
        assert!(similar.iter().any(|p| p.contains("last name")));
    }
}

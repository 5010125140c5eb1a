// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Foodgram: a recipe-sharing backend
//!
//! This crate provides the REST API for publishing recipes, keeping
//! favorites and a shopping cart, and following other authors.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod filters;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod serializers;
pub mod services;

use config::Config;
use db::Database;
use services::ImageStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub images: ImageStore,
}

impl AppState {
    /// Open the database and set up storage for the given config.
    pub async fn new(config: Config) -> error::Result<Self> {
        let db = Database::connect(&config).await?;
        let images = ImageStore::new(config.media_root.clone());
        Ok(Self { config, db, images })
    }
}

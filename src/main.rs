// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Foodgram API Server
//!
//! Serves the recipe, user and shopping-cart API over HTTP, plus the
//! uploaded recipe images.

use foodgram::{config::Config, logging::init_logging, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Foodgram API");

    tokio::fs::create_dir_all(&config.media_root).await?;
    tracing::info!(path = %config.media_root.display(), "Media directory ready");

    let state = Arc::new(AppState::new(config.clone()).await?);

    let app = foodgram::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

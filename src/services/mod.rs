// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - logic that sits outside the request/store path.

pub mod images;
pub mod loader;
pub mod password;
pub mod shopping_list;

pub use images::{ImageError, ImageStore};
pub use loader::{load_ingredients, FileReport, LoadOptions, LoaderError};

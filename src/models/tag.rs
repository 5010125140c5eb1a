//! Recipe tags.

use serde::{Deserialize, Serialize};

/// Tag row; also its wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    /// Hex color, e.g. `#FF0000`
    pub color: String,
    /// Stable key used by the recipe tag filter
    pub slug: String,
}

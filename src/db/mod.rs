//! Database layer (SQLite via sqlx).

mod catalog;
mod recipes;
pub mod sqlite;
mod users;

pub use catalog::IngredientImport;
pub use sqlite::Database;

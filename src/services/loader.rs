// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bulk ingredient loader.
//!
//! Reads the known CSV files from a directory into the ingredient table. A
//! missing or unreadable directory aborts the run, as does a file that
//! exists but cannot be read; a missing file only logs a warning.

use crate::db::Database;
use crate::error::AppError;
use crate::models::NewIngredient;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Files the loader looks for, in processing order.
pub const CSV_SOURCES: &[&str] = &["ingredients.csv"];

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("Directory {0} not found")]
    MissingDirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error(transparent)]
    Database(#[from] AppError),
}

/// Loader run settings.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub dir: PathBuf,
    /// Keep rows already in the table instead of clearing it first
    pub preserve_existing: bool,
}

/// Outcome for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file: &'static str,
    /// `false` when the file was not present
    pub found: bool,
    pub rows_before: i64,
    pub rows_after: i64,
    pub inserted: u64,
}

/// Load every known CSV file found in `options.dir`.
pub async fn load_ingredients(
    db: &Database,
    options: &LoadOptions,
) -> Result<Vec<FileReport>, LoaderError> {
    check_directory(&options.dir).await?;
    tracing::info!(dir = %options.dir.display(), "Loading CSV files");

    let mut reports = Vec::with_capacity(CSV_SOURCES.len());
    for &file in CSV_SOURCES {
        reports.push(load_file(db, &options.dir, file, options.preserve_existing).await?);
    }
    Ok(reports)
}

/// The input directory must exist and be listable.
async fn check_directory(dir: &Path) -> Result<(), LoaderError> {
    let io_error = |source| LoaderError::Io {
        path: dir.to_path_buf(),
        source,
    };

    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            tracing::error!(dir = %dir.display(), "CSV path is not a directory");
            return Err(LoaderError::MissingDirectory(dir.to_path_buf()));
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::error!(dir = %dir.display(), "CSV directory not found");
            return Err(LoaderError::MissingDirectory(dir.to_path_buf()));
        }
        Err(err) => {
            tracing::error!(dir = %dir.display(), error = %err, "CSV directory unreadable");
            return Err(io_error(err));
        }
    }

    tokio::fs::read_dir(dir).await.map_err(|err| {
        tracing::error!(dir = %dir.display(), error = %err, "CSV directory unreadable");
        io_error(err)
    })?;
    Ok(())
}

async fn load_file(
    db: &Database,
    dir: &Path,
    file: &'static str,
    preserve_existing: bool,
) -> Result<FileReport, LoaderError> {
    let rows_before = db.count_ingredients().await?;
    let path = dir.join(file);

    let raw = match tokio::fs::read(&path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::warn!(file, "Expected file is missing, skipping");
            return Ok(FileReport {
                file,
                found: false,
                rows_before,
                rows_after: rows_before,
                inserted: 0,
            });
        }
        Err(source) => return Err(LoaderError::Io { path, source }),
    };
    let rows = parse_rows(&raw).map_err(|source| LoaderError::Csv {
        path: path.clone(),
        source,
    })?;

    tracing::info!(file, rows = rows.len(), rows_before, "Processing file");
    let import = db.import_ingredients(&rows, !preserve_existing).await?;
    if !preserve_existing {
        tracing::info!(file, removed = import.removed, "Cleared existing ingredients");
    }
    let rows_after = db.count_ingredients().await?;

    if import.inserted > 0 {
        tracing::info!(file, inserted = import.inserted, rows_after, "File loaded");
    } else {
        tracing::warn!(file, rows_after, "File loaded no new rows");
    }

    Ok(FileReport {
        file,
        found: true,
        rows_before,
        rows_after,
        inserted: import.inserted,
    })
}

/// Parse headerless `name,measurement_unit` rows, skipping blank names.
fn parse_rows(raw: &[u8]) -> Result<Vec<NewIngredient>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(raw);

    let mut rows = Vec::new();
    for record in reader.deserialize::<NewIngredient>() {
        let row = record?;
        if !row.name.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bulk ingredient loader against a real database.

use foodgram::config::Config;
use foodgram::db::Database;
use foodgram::models::NewIngredient;
use foodgram::services::{load_ingredients, LoadOptions, LoaderError};
use std::path::Path;

async fn memory_db() -> Database {
    Database::connect(&Config::test_default()).await.unwrap()
}

async fn seed_stale(db: &Database) {
    db.import_ingredients(
        &[NewIngredient {
            name: "stale".to_string(),
            measurement_unit: "kg".to_string(),
        }],
        false,
    )
    .await
    .unwrap();
}

fn options(dir: &Path) -> LoadOptions {
    LoadOptions {
        dir: dir.to_path_buf(),
        preserve_existing: false,
    }
}

fn write_csv(dir: &Path, contents: &str) {
    std::fs::write(dir.join("ingredients.csv"), contents).unwrap();
}

#[tokio::test]
async fn test_load_replaces_table() {
    let db = memory_db().await;
    seed_stale(&db).await;

    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "flour,g\nsalt,g\nflour,g\nmilk,ml\n");

    let reports = load_ingredients(
        &db,
        &LoadOptions {
            dir: dir.path().to_path_buf(),
            preserve_existing: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert!(report.found);
    assert_eq!(report.rows_before, 1);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.rows_after, 3);

    let names: Vec<String> = db
        .list_ingredients()
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["flour", "milk", "salt"]);
}

#[tokio::test]
async fn test_no_delete_keeps_existing_rows() {
    let db = memory_db().await;
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "flour,g\nsalt,g\n");
    let options = LoadOptions {
        dir: dir.path().to_path_buf(),
        preserve_existing: true,
    };

    load_ingredients(&db, &options).await.unwrap();
    write_csv(dir.path(), "salt,g\nsugar,g\n");
    let reports = load_ingredients(&db, &options).await.unwrap();

    assert_eq!(reports[0].rows_before, 2);
    assert_eq!(reports[0].inserted, 1);
    assert_eq!(reports[0].rows_after, 3);
}

#[tokio::test]
async fn test_missing_file_is_skipped() {
    let db = memory_db().await;
    let dir = tempfile::tempdir().unwrap();

    let reports = load_ingredients(
        &db,
        &LoadOptions {
            dir: dir.path().to_path_buf(),
            preserve_existing: false,
        },
    )
    .await
    .unwrap();

    assert!(!reports[0].found);
    assert_eq!(reports[0].inserted, 0);
}

#[tokio::test]
async fn test_missing_directory_is_fatal() {
    let db = memory_db().await;
    let dir = tempfile::tempdir().unwrap();

    let result = load_ingredients(
        &db,
        &LoadOptions {
            dir: dir.path().join("nope"),
            preserve_existing: false,
        },
    )
    .await;

    assert!(matches!(result, Err(LoaderError::MissingDirectory(_))));
}

#[tokio::test]
async fn test_unlistable_directory_is_fatal() {
    let db = memory_db().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "not a directory").unwrap();

    // Looking inside a regular file fails with something other than
    // "not found".
    let result = load_ingredients(&db, &options(&file.join("csv"))).await;

    assert!(matches!(result, Err(LoaderError::Io { .. })));
}

#[tokio::test]
async fn test_unreadable_file_is_fatal() {
    let db = memory_db().await;
    seed_stale(&db).await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("ingredients.csv")).unwrap();

    let result = load_ingredients(&db, &options(dir.path())).await;

    match result {
        Err(LoaderError::Io { path, .. }) => assert!(path.ends_with("ingredients.csv")),
        other => panic!("expected an I/O error, got {:?}", other),
    }
    assert_eq!(db.count_ingredients().await.unwrap(), 1);
}

#[tokio::test]
async fn test_failed_load_keeps_existing_rows() {
    let db = memory_db().await;
    seed_stale(&db).await;
    let dir = tempfile::tempdir().unwrap();
    let unit = "u".repeat(40);
    write_csv(dir.path(), &format!("flour,g\nsalt,{}\n", unit));

    let result = load_ingredients(&db, &options(dir.path())).await;

    assert!(matches!(result, Err(LoaderError::Database(_))));
    let names: Vec<String> = db
        .list_ingredients()
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["stale"]);
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Load ingredient CSV files into the database.

use clap::Parser;
use foodgram::config::{data_dir_from_env, database_url_from_env};
use foodgram::db::Database;
use foodgram::logging::init_logging;
use foodgram::services::{load_ingredients, LoadOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// `load-ingredients` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "load-ingredients",
    about = "Load ingredients from CSV files into the database",
    version
)]
struct CliArgs {
    /// Directory holding the CSV files. Defaults to `DATA_DIR`.
    #[arg(long = "csv-path", value_name = "dir")]
    csv_path: Option<PathBuf>,
    /// Keep existing rows instead of clearing the table first.
    #[arg(long = "no-delete")]
    no_delete: bool,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging();

    let args = CliArgs::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Ingredient load failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let database_url = args.database_url.unwrap_or_else(database_url_from_env);
    let db = Database::connect_url(&database_url).await?;

    let options = LoadOptions {
        dir: args.csv_path.unwrap_or_else(data_dir_from_env),
        preserve_existing: args.no_delete,
    };

    let reports = load_ingredients(&db, &options).await?;
    let inserted: u64 = reports.iter().map(|report| report.inserted).sum();
    tracing::info!(files = reports.len(), inserted, "Ingredient load finished");
    Ok(())
}

mod models;

pub use models::*;

use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub type DbPool = SqlitePool;

/// Open (creating if needed) the sqlite database under `data_dir` and
/// bring its schema up to date.
pub async fn init(data_dir: &Path) -> Result<DbPool> {
    let path = data_dir.join("bookery.db");
    info!("Opening database at {}", path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&format!("sqlite:{}?mode=rwc", path.display()))
        .await?;

    // WAL keeps readers from blocking the write path
    for pragma in [
        "PRAGMA journal_mode = WAL",
        "PRAGMA synchronous = NORMAL",
        "PRAGMA foreign_keys = ON",
    ] {
        sqlx::query(pragma).execute(&pool).await?;
    }

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply the embedded schema. sqlite executes one statement at a time,
/// so the file is split on semicolons with comment lines stripped.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    let schema = include_str!("../../migrations/001_initial.sql");

    for statement in schema.split(';') {
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim_start().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            sqlx::query(cleaned).execute(pool).await?;
        }
    }

    info!("Database schema is up to date");
    Ok(())
}

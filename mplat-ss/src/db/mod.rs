//! Database access for mplat-ss
//!
//! The Song Service owns the `songs` table. Song ids are supplied by the Resource
//! Service, never generated here.

pub mod songs;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Open the song database and create tables if needed
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    let pool = mplat_common::db::init_database(db_path).await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Open a private in-memory song database (tests, ephemeral runs)
pub async fn init_in_memory_pool() -> Result<SqlitePool> {
    let pool = mplat_common::db::init_in_memory().await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Create the `songs` table
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            artist TEXT NOT NULL,
            album TEXT NOT NULL,
            duration TEXT NOT NULL,
            year TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

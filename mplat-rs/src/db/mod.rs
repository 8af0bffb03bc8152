//! Database access for mplat-rs
//!
//! The Resource Service owns the `resources` table; nothing else writes to it.

pub mod resources;

pub use resources::SqliteResourceStore;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Open the resource database and create tables if needed
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    let pool = mplat_common::db::init_database(db_path).await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Open a private in-memory resource database (tests, ephemeral runs)
pub async fn init_in_memory_pool() -> Result<SqlitePool> {
    let pool = mplat_common::db::init_in_memory().await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Create the `resources` table
///
/// AUTOINCREMENT keeps ids monotonic, so an id freed by a rolled-back create is
/// never handed to a later resource.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resources (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            audio_data BLOB NOT NULL,
            content_type TEXT NOT NULL DEFAULT 'audio/mpeg',
            file_size INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

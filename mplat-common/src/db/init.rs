//! Database initialization
//!
//! Each service owns its own SQLite file. Opening creates the file and parent
//! directory on first run; schema creation is left to the service.

use crate::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Busy timeout applied to every pool
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Open (or create) a SQLite database file
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    apply_busy_timeout(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database
///
/// Pinned to a single long-lived connection: every SQLite `:memory:` connection is a
/// separate database.
pub async fn init_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    apply_busy_timeout(&pool).await?;

    Ok(pool)
}

async fn apply_busy_timeout(pool: &SqlitePool) -> Result<()> {
    let pragma_sql = format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS);
    sqlx::query(&pragma_sql).execute(pool).await?;
    Ok(())
}

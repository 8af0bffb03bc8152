//! Song metadata database operations

use anyhow::Result;
use mplat_common::api::{SongMetadata, SongResponse};
use sqlx::{Row, SqlitePool};

/// Insert metadata under `id` unless that id is already taken
///
/// Returns `false` when a record with `id` already exists; the existing record is left
/// untouched.
pub async fn insert_song(pool: &SqlitePool, id: i64, metadata: &SongMetadata) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO songs (id, name, artist, album, duration, year, created_at)
        VALUES (?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(&metadata.name)
    .bind(&metadata.artist)
    .bind(&metadata.album)
    .bind(&metadata.duration)
    .bind(&metadata.year)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load song metadata by id
pub async fn load_song(pool: &SqlitePool, id: i64) -> Result<Option<SongResponse>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, artist, album, duration, year
        FROM songs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| SongResponse {
        id: row.get("id"),
        metadata: SongMetadata {
            name: row.get("name"),
            artist: row.get("artist"),
            album: row.get("album"),
            duration: row.get("duration"),
            year: row.get("year"),
        },
    }))
}

/// Delete one record, returning whether it existed
pub async fn delete_song(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete every listed id that exists
///
/// Returns the ids actually removed, in input order. Absent and repeated ids are
/// skipped.
pub async fn delete_songs(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<i64>> {
    let mut deleted = Vec::with_capacity(ids.len());

    for &id in ids {
        if delete_song(pool, id).await? {
            tracing::info!(song_id = id, "Deleted song metadata");
            deleted.push(id);
        } else {
            tracing::warn!(song_id = id, "Song metadata not found for deletion");
        }
    }

    Ok(deleted)
}

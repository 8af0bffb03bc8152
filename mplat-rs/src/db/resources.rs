//! Resource database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::services::ResourceStore;

const AUDIO_MPEG_MEDIA_TYPE: &str = "audio/mpeg";

/// SQLite-backed [`ResourceStore`]
#[derive(Clone)]
pub struct SqliteResourceStore {
    pool: SqlitePool,
}

impl SqliteResourceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of stored resources
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ResourceStore for SqliteResourceStore {
    async fn save(&self, audio_data: &[u8]) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO resources (audio_data, content_type, file_size) VALUES (?, ?, ?)",
        )
        .bind(audio_data)
        .bind(AUDIO_MPEG_MEDIA_TYPE)
        .bind(audio_data.len() as i64)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        // Single statement: existence check and removal cannot interleave
        let result = sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Vec<u8>>> {
        let audio_data: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT audio_data FROM resources WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(audio_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory_pool;

    async fn store() -> SqliteResourceStore {
        SqliteResourceStore::new(init_in_memory_pool().await.expect("Failed to create database"))
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = store().await;

        let id = store.save(b"ID3 audio").await.unwrap();
        assert!(id > 0);
        assert!(store.exists_by_id(id).await.unwrap());
        assert_eq!(store.find_by_id(id).await.unwrap().as_deref(), Some(&b"ID3 audio"[..]));
        assert_eq!(store.find_by_id(id + 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_reports_removal_once() {
        let store = store().await;

        let id = store.save(b"ID3 audio").await.unwrap();
        assert!(store.delete_by_id(id).await.unwrap());
        assert!(!store.delete_by_id(id).await.unwrap());
        assert!(!store.exists_by_id(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = store().await;

        let first = store.save(b"a").await.unwrap();
        store.delete_by_id(first).await.unwrap();
        let second = store.save(b"b").await.unwrap();
        assert!(second > first);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}

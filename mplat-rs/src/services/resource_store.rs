//! Local resource persistence interface
//!
//! The coordinators only see this trait; the SQLite implementation lives in
//! [`crate::db::resources`].

use anyhow::Result;
use async_trait::async_trait;

/// Store owning resource records (id + audio blob)
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Persist a new blob and return its generated id
    ///
    /// Ids are never reissued, including ids freed by a delete.
    async fn save(&self, audio_data: &[u8]) -> Result<i64>;

    /// Check whether a record exists
    async fn exists_by_id(&self, id: i64) -> Result<bool>;

    /// Delete a record if present
    ///
    /// Returns `true` only for the caller that actually removed the row, so two
    /// concurrent deletes of the same id cannot both report success.
    async fn delete_by_id(&self, id: i64) -> Result<bool>;

    /// Load a blob
    async fn find_by_id(&self, id: i64) -> Result<Option<Vec<u8>>>;
}

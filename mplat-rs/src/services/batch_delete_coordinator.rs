//! Batch deletion across both services
//!
//! The local result is authoritative: the response lists exactly the ids removed from
//! the resource store. Song Service cleanup runs afterwards on its own task, with the
//! original raw batch, and never affects the response.
//!
//! Duplicate ids are deleted at most once. The first occurrence removes the record, later
//! occurrences find nothing and are skipped, so each id appears at most once in the
//! result.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::error::ServiceError;
use crate::services::{MetadataGateway, ResourceStore};
use mplat_common::validation::{join_ids, parse_batch};

/// Result of a batch delete
#[derive(Debug)]
pub struct BatchDeleteOutcome {
    /// Ids removed locally, in input order
    pub deleted_ids: Vec<i64>,
    /// Song Service cleanup task
    ///
    /// Dropping the handle detaches the task; it still runs to completion.
    pub remote_cleanup: JoinHandle<()>,
}

/// Orchestrates batch deletion across both services
pub struct BatchDeleteCoordinator {
    store: Arc<dyn ResourceStore>,
    gateway: Arc<dyn MetadataGateway>,
}

impl BatchDeleteCoordinator {
    pub fn new(store: Arc<dyn ResourceStore>, gateway: Arc<dyn MetadataGateway>) -> Self {
        Self { store, gateway }
    }

    /// Delete a comma-separated batch of ids
    ///
    /// The whole batch is validated before anything is deleted. Absent ids are skipped
    /// silently, so repeating a delete returns an empty list rather than an error.
    pub async fn delete_batch(&self, csv_ids: &str) -> Result<BatchDeleteOutcome, ServiceError> {
        let ids = parse_batch(csv_ids)?;

        let mut deleted_ids = Vec::with_capacity(ids.len());
        for id in ids {
            match self.store.delete_by_id(id).await {
                Ok(true) => {
                    tracing::info!(resource_id = id, "Deleted resource");
                    deleted_ids.push(id);
                }
                Ok(false) => {
                    tracing::warn!(resource_id = id, "Resource not found for deletion");
                }
                Err(e) => {
                    // Still clean up metadata for what is already gone locally
                    if !deleted_ids.is_empty() {
                        self.spawn_remote_cleanup(join_ids(&deleted_ids));
                    }
                    tracing::error!(
                        resource_id = id,
                        deleted = deleted_ids.len(),
                        error = %e,
                        "Batch delete aborted by store failure"
                    );
                    return Err(ServiceError::Store(e));
                }
            }
        }

        let remote_cleanup = self.spawn_remote_cleanup(csv_ids.to_string());

        Ok(BatchDeleteOutcome {
            deleted_ids,
            remote_cleanup,
        })
    }

    fn spawn_remote_cleanup(&self, csv_ids: String) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move {
            gateway.delete_metadata_batch(&csv_ids).await;
        })
    }
}

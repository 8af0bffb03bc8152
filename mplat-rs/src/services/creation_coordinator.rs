//! Resource creation with compensation
//!
//! The two records live in different stores with no shared transaction. The local
//! resource is written first and rolled back if the Song Service does not accept the
//! metadata, so metadata never points at a missing resource.
//!
//! ```text
//! Start ─► LocalPersisted ─► MetadataRegistered            (success)
//!                │
//!                └─► CompensatingDelete ─► Failed           (remote failure)
//! ```
//!
//! A failed compensating delete is surfaced as [`ServiceError::CompensationFailed`],
//! distinct from an ordinary remote failure.
//!
//! When the remote call failed without a definite answer (timeout, dropped
//! connection), the Song Service may still have stored the record. Compensation then
//! also asks it to delete metadata for the id, best-effort.

use std::fmt;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::services::{AudioInspector, MetadataGateway, RemoteFailure, ResourceStore};
use mplat_common::api::SongMetadata;

/// Creation protocol stage, logged as the `stage` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStage {
    Start,
    LocalPersisted,
    MetadataRegistered,
    CompensatingDelete,
    Failed,
}

impl fmt::Display for CreationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CreationStage::Start => "start",
            CreationStage::LocalPersisted => "local_persisted",
            CreationStage::MetadataRegistered => "metadata_registered",
            CreationStage::CompensatingDelete => "compensating_delete",
            CreationStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Orchestrates single-resource creation across both services
pub struct CreationCoordinator {
    store: Arc<dyn ResourceStore>,
    gateway: Arc<dyn MetadataGateway>,
    inspector: Arc<dyn AudioInspector>,
}

impl CreationCoordinator {
    pub fn new(
        store: Arc<dyn ResourceStore>,
        gateway: Arc<dyn MetadataGateway>,
        inspector: Arc<dyn AudioInspector>,
    ) -> Self {
        Self {
            store,
            gateway,
            inspector,
        }
    }

    /// Create a resource and its song metadata
    ///
    /// Returns the new resource id once both records exist. On any error no resource
    /// record remains, except for [`ServiceError::CompensationFailed`].
    pub async fn create(&self, audio_data: Vec<u8>) -> Result<i64, ServiceError> {
        tracing::debug!(stage = %CreationStage::Start, bytes = audio_data.len(), "Creating resource");

        // Nothing is persisted for an invalid payload
        self.inspector.validate(&audio_data)?;

        // Tag parsing is CPU-bound and may be handed a large file. It runs before the
        // save, so a failure here has nothing to undo.
        let audio_data = Arc::new(audio_data);
        let metadata = self.extract_metadata(Arc::clone(&audio_data)).await;

        let id = self.store.save(&audio_data).await?;
        tracing::info!(
            resource_id = id,
            stage = %CreationStage::LocalPersisted,
            "Created resource"
        );

        match self.gateway.create_metadata(id, &metadata).await {
            Ok(()) => {
                tracing::info!(
                    resource_id = id,
                    stage = %CreationStage::MetadataRegistered,
                    "Resource and song metadata created"
                );
                Ok(id)
            }
            Err(remote) => Err(self.compensate(id, remote).await),
        }
    }

    async fn extract_metadata(&self, audio_data: Arc<Vec<u8>>) -> SongMetadata {
        let inspector = Arc::clone(&self.inspector);
        let task = tokio::task::spawn_blocking(move || inspector.extract_metadata(&audio_data));

        match task.await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::error!(error = %e, "Metadata extraction task failed - using defaults");
                self.inspector.fallback_metadata()
            }
        }
    }

    /// Undo the local persist after a remote failure
    async fn compensate(&self, id: i64, remote: RemoteFailure) -> ServiceError {
        tracing::warn!(
            resource_id = id,
            stage = %CreationStage::CompensatingDelete,
            error = %remote,
            "Metadata registration failed - deleting resource"
        );

        match self.store.delete_by_id(id).await {
            Ok(removed) => {
                if removed {
                    tracing::info!(
                        resource_id = id,
                        stage = %CreationStage::Failed,
                        "Deleted recently created resource"
                    );
                } else {
                    // Already gone (concurrent batch delete); no orphan remains either way
                    tracing::warn!(
                        resource_id = id,
                        stage = %CreationStage::Failed,
                        "Resource already removed before compensation"
                    );
                }

                // A slow Song Service may have stored the record before the call failed
                if remote.may_have_committed() {
                    tracing::info!(resource_id = id, "Retracting possibly stored song metadata");
                    self.gateway.delete_metadata_batch(&id.to_string()).await;
                }

                ServiceError::DataProcessing(remote)
            }
            Err(cause) => {
                // Any metadata the Song Service did store now matches the surviving resource
                tracing::error!(
                    resource_id = id,
                    stage = %CreationStage::Failed,
                    remote_error = %remote,
                    error = %cause,
                    "Compensating delete failed - resource persisted without metadata"
                );
                ServiceError::CompensationFailed { id, remote, cause }
            }
        }
    }
}

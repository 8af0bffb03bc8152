//! mplat-rs library - Resource Service
//!
//! Stores MP3 blobs and keeps the Song Service's metadata records paired with them:
//! - Creation persists the blob, registers metadata remotely and rolls the blob back
//!   when registration fails
//! - Batch deletion removes blobs locally and asks the Song Service to drop the
//!   matching metadata

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult, ServiceError};

use crate::services::{
    AudioInspector, BatchDeleteCoordinator, CreationCoordinator, MetadataGateway, ResourceStore,
};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Local resource store
    pub store: Arc<dyn ResourceStore>,
    /// Create-with-compensation protocol
    pub creation: Arc<CreationCoordinator>,
    /// Batch delete protocol
    pub batch_delete: Arc<BatchDeleteCoordinator>,
    /// Upload body limit
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wire the coordinators around one store and one gateway
    pub fn new(
        store: Arc<dyn ResourceStore>,
        gateway: Arc<dyn MetadataGateway>,
        inspector: Arc<dyn AudioInspector>,
        max_upload_bytes: usize,
    ) -> Self {
        let creation = Arc::new(CreationCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&gateway),
            inspector,
        ));
        let batch_delete = Arc::new(BatchDeleteCoordinator::new(Arc::clone(&store), gateway));

        Self {
            store,
            creation,
            batch_delete,
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::resource_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

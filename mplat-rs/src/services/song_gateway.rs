//! Song Service client
//!
//! The Resource Service reaches song metadata only through [`MetadataGateway`]:
//! - `create_metadata` is a fallible call; every failure is a [`RemoteFailure`]
//! - `delete_metadata_batch` is best-effort and never reports failure to the caller
//!
//! Neither operation retries.

use async_trait::async_trait;
use mplat_common::api::{CreateSongRequest, SongMetadata};
use std::time::Duration;
use thiserror::Error;

const SONGS_ENDPOINT: &str = "/songs";
const USER_AGENT: &str = concat!("mplat-rs/", env!("CARGO_PKG_VERSION"));

/// Failed call to the Song Service
#[derive(Debug, Error)]
pub enum RemoteFailure {
    /// Connection could not be established (refused, DNS failure)
    #[error("Song service unreachable: {0}")]
    Unreachable(String),

    /// Connection dropped after the request may have been sent
    #[error("Song service connection interrupted: {0}")]
    Interrupted(String),

    /// No response within the configured timeout
    #[error("Song service did not respond within {0} ms")]
    Timeout(u64),

    /// Song Service answered with a non-2xx status
    #[error("Failed to save appropriate metadata for resource with ID: {id} (status {status})")]
    Rejected { id: i64, status: u16, body: String },
}

impl RemoteFailure {
    /// Whether the Song Service may have stored the record despite the failure
    ///
    /// Only a definite answer (an explicit rejection) or a connection that never opened
    /// rules out a write.
    pub fn may_have_committed(&self) -> bool {
        matches!(self, RemoteFailure::Timeout(_) | RemoteFailure::Interrupted(_))
    }
}

/// Resource Service view of the Song Service
#[async_trait]
pub trait MetadataGateway: Send + Sync {
    /// Register metadata under the given resource id
    async fn create_metadata(&self, id: i64, metadata: &SongMetadata) -> Result<(), RemoteFailure>;

    /// Ask the Song Service to delete a raw comma-separated id batch
    ///
    /// Transport and status errors are logged and swallowed.
    async fn delete_metadata_batch(&self, csv_ids: &str);
}

/// HTTP implementation of [`MetadataGateway`]
pub struct HttpSongGateway {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSongGateway {
    /// Create a gateway for the Song Service at `base_url`
    ///
    /// `timeout` bounds every request; expiry is reported as [`RemoteFailure::Timeout`].
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn songs_url(&self) -> String {
        format!("{}{}", self.base_url, SONGS_ENDPOINT)
    }

    fn classify(&self, error: reqwest::Error) -> RemoteFailure {
        if error.is_timeout() {
            RemoteFailure::Timeout(self.timeout.as_millis() as u64)
        } else if error.is_connect() {
            RemoteFailure::Unreachable(error.to_string())
        } else {
            RemoteFailure::Interrupted(error.to_string())
        }
    }
}

#[async_trait]
impl MetadataGateway for HttpSongGateway {
    async fn create_metadata(&self, id: i64, metadata: &SongMetadata) -> Result<(), RemoteFailure> {
        let request = CreateSongRequest::new(id, metadata.clone());

        let response = self
            .http_client
            .post(self.songs_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                resource_id = id,
                status = status.as_u16(),
                body = %body,
                "Song service rejected metadata"
            );
            return Err(RemoteFailure::Rejected {
                id,
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(resource_id = id, "Successfully saved metadata for resource");
        Ok(())
    }

    async fn delete_metadata_batch(&self, csv_ids: &str) {
        let result = self
            .http_client
            .delete(self.songs_url())
            .query(&[("id", csv_ids)])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(ids = %csv_ids, "Song metadata batch delete acknowledged");
            }
            Ok(response) => {
                tracing::warn!(
                    ids = %csv_ids,
                    status = response.status().as_u16(),
                    "Song service refused metadata batch delete"
                );
            }
            Err(e) => {
                tracing::warn!(
                    ids = %csv_ids,
                    error = %self.classify(e),
                    "Song metadata batch delete failed"
                );
            }
        }
    }
}

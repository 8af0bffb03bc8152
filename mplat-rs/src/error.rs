//! Error types for mplat-rs
//!
//! [`ServiceError`] is what the coordinators return; [`ApiError`] maps it onto HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mplat_common::api::ErrorResponse;
use mplat_common::ValidationError;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::services::{InvalidAudio, RemoteFailure};

const GENERIC_SERVER_ERROR: &str = "An error occurred on the server.";

/// Failures of the creation and deletion protocols
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed identifier or batch
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Upload is not acceptable audio; nothing was persisted
    #[error(transparent)]
    InvalidPayload(#[from] InvalidAudio),

    /// Direct read of an id that does not exist
    #[error("Resource with ID={0} not found")]
    NotFound(i64),

    /// Metadata registration failed and the local resource was rolled back
    #[error("Failed to save resource for the following reason: {0}")]
    DataProcessing(RemoteFailure),

    /// Metadata registration failed and the rollback failed too
    ///
    /// The resource with `id` is persisted without metadata.
    #[error("Resource with ID={id} could not be removed after metadata registration failed ({remote}): {cause}")]
    CompensationFailed {
        id: i64,
        remote: RemoteFailure,
        cause: anyhow::Error,
    },

    /// Local store failure
    #[error("Storage error: {0}")]
    Store(#[from] anyhow::Error),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Metadata registration failed, resource rolled back (500)
    #[error("Data processing error: {0}")]
    DataProcessing(String),

    /// Resource left without metadata (500)
    #[error("Compensation failed: {0}")]
    CompensationFailed(String),

    /// Internal server error (500), detail is logged, not returned
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => ApiError::BadRequest(e.to_string()),
            ServiceError::InvalidPayload(e) => ApiError::BadRequest(e.to_string()),
            e @ ServiceError::NotFound(_) => ApiError::NotFound(e.to_string()),
            e @ ServiceError::DataProcessing(_) => ApiError::DataProcessing(e.to_string()),
            e @ ServiceError::CompensationFailed { .. } => {
                ApiError::CompensationFailed(e.to_string())
            }
            ServiceError::Store(e) => ApiError::Internal(format!("{:#}", e)),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(msg, StatusCode::BAD_REQUEST.as_u16()),
                )
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(msg, StatusCode::NOT_FOUND.as_u16()),
                )
            }
            ApiError::DataProcessing(msg) => {
                tracing::warn!("Data processing error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(msg, StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                )
            }
            ApiError::CompensationFailed(msg) => {
                tracing::error!("Compensation failed: {}", msg);
                let details = BTreeMap::from([(
                    "condition".to_string(),
                    "compensation_failed".to_string(),
                )]);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(msg, StatusCode::INTERNAL_SERVER_ERROR.as_u16())
                        .with_details(details),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        GENERIC_SERVER_ERROR,
                        StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

//! Error types for mplat-ss

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mplat_common::api::ErrorResponse;
use mplat_common::ValidationError;
use std::collections::BTreeMap;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Field validation failed (400), field → message
    #[error("Validation error: {0:?}")]
    Validation(BTreeMap<String, String>),

    /// Song metadata not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Metadata already registered for this id (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Generic error (500), detail is logged, not returned
    #[error(transparent)]
    Other(#[from] anyhow::Error),
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
            ApiError::Validation(details) => {
                tracing::info!("Validation failed: {:?}", details);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Validation error", StatusCode::BAD_REQUEST.as_u16())
                        .with_details(details),
                )
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(msg, StatusCode::NOT_FOUND.as_u16()),
                )
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new(msg, StatusCode::CONFLICT.as_u16()),
                )
            }
            ApiError::Other(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "An error occurred on the server.",
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

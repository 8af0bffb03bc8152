//! Resource API handlers
//!
//! POST /resources, GET /resources/{id}, DELETE /resources?id=1,2,3

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mplat_common::api::{CreatedResponse, DeletedResponse, IdBatchQuery};
use mplat_common::validation::validate_id;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult, ServiceError};
use crate::AppState;

const AUDIO_MPEG_MEDIA_TYPE: &str = "audio/mpeg";

/// POST /resources
///
/// Body is the raw MP3 file. Returns the new resource id.
pub async fn upload_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<CreatedResponse>> {
    check_content_type(&headers)?;

    // Run the protocol on its own task: a dropped connection must not cancel a
    // compensating delete halfway through
    let coordinator = Arc::clone(&state.creation);
    let id = tokio::spawn(async move { coordinator.create(Vec::from(body)).await })
        .await
        .map_err(|e| ApiError::Internal(format!("Resource creation task failed: {}", e)))??;

    Ok(Json(CreatedResponse { id }))
}

/// GET /resources/{id}
///
/// Returns the stored MP3 bytes.
pub async fn get_resource(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = validate_id(&raw_id)?;

    let audio_data = state
        .store
        .find_by_id(id)
        .await
        .map_err(ServiceError::Store)?
        .filter(|data| !data.is_empty())
        .ok_or(ServiceError::NotFound(id))?;

    Ok(([(header::CONTENT_TYPE, AUDIO_MPEG_MEDIA_TYPE)], audio_data).into_response())
}

/// DELETE /resources?id=1,2,3
///
/// Returns the ids actually deleted.
pub async fn delete_resources(
    State(state): State<AppState>,
    query: Result<Query<IdBatchQuery>, QueryRejection>,
) -> ApiResult<Json<DeletedResponse>> {
    let Query(query) = query.map_err(|_| {
        ApiError::BadRequest("Required request parameter 'id' is missing".to_string())
    })?;

    tracing::info!(ids = %query.id, "Deleting resources");

    let outcome = state.batch_delete.delete_batch(&query.id).await?;

    // Song Service cleanup keeps running after the response is sent
    drop(outcome.remote_cleanup);

    Ok(Json(DeletedResponse {
        ids: outcome.deleted_ids,
    }))
}

/// Only `audio/mpeg` uploads are accepted (parameters such as charset are ignored)
fn check_content_type(headers: &HeaderMap) -> ApiResult<()> {
    let media_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase());

    match media_type.as_deref() {
        Some(AUDIO_MPEG_MEDIA_TYPE) => Ok(()),
        Some("application/json") => Err(ApiError::BadRequest(
            "Invalid file format: application/json. Only MP3 files are allowed".to_string(),
        )),
        _ => Err(ApiError::BadRequest(
            "Unsupported media type. Supported media type is audio/mpeg".to_string(),
        )),
    }
}

/// Build resource routes
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/resources", post(upload_resource).delete(delete_resources))
        .route("/resources/:id", get(get_resource))
}

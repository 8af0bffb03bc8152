//! Song metadata API handlers
//!
//! POST /songs, GET /songs/{id}, DELETE /songs?id=1,2,3

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use mplat_common::api::{
    CreateSongRequest, CreatedResponse, DeletedResponse, IdBatchQuery, SongResponse,
};
use mplat_common::validation::{parse_batch, validate_id, validate_song_fields};

use crate::db::songs;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /songs
///
/// Registers metadata under the resource id supplied by the Resource Service.
pub async fn create_song(
    State(state): State<AppState>,
    payload: Result<Json<CreateSongRequest>, JsonRejection>,
) -> ApiResult<Json<CreatedResponse>> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!("Not readable: {}", e);
        ApiError::BadRequest("Malformed JSON request".to_string())
    })?;

    tracing::info!(song_id = ?request.id, name = %request.metadata.name, "Received request to create song metadata");

    let mut details = validate_song_fields(&request.metadata);
    match request.id {
        None => {
            details.insert("id".to_string(), "ID is required".to_string());
        }
        Some(id) if id <= 0 => {
            details.insert("id".to_string(), "ID must be positive".to_string());
        }
        Some(_) => {}
    }

    let id = match request.id {
        Some(id) if details.is_empty() => id,
        _ => return Err(ApiError::Validation(details)),
    };

    // 409 rather than 400: the request is well-formed, the id is already taken
    if !songs::insert_song(&state.db, id, &request.metadata).await? {
        return Err(ApiError::Conflict(format!(
            "Metadata for ID={} already exists",
            id
        )));
    }

    tracing::info!(song_id = id, "Created song metadata");
    Ok(Json(CreatedResponse { id }))
}

/// GET /songs/{id}
pub async fn get_song(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<SongResponse>> {
    let id = validate_id(&raw_id)?;

    songs::load_song(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Song metadata with ID={} not found", id)))
}

/// DELETE /songs?id=1,2,3
///
/// Returns the ids actually deleted; unknown ids are skipped.
pub async fn delete_songs(
    State(state): State<AppState>,
    query: Result<Query<IdBatchQuery>, QueryRejection>,
) -> ApiResult<Json<DeletedResponse>> {
    let Query(query) = query.map_err(|_| {
        ApiError::BadRequest("Required request parameter 'id' is missing".to_string())
    })?;

    tracing::info!(ids = %query.id, "Deleting song metadata");

    let ids = parse_batch(&query.id)?;
    let deleted = songs::delete_songs(&state.db, &ids).await?;

    Ok(Json(DeletedResponse { ids: deleted }))
}

/// Build song routes
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs", post(create_song).delete(delete_songs))
        .route("/songs/:id", get(get_song))
}

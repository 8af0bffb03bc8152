//! Request/response bodies exchanged over HTTP
//!
//! The Resource Service sends [`CreateSongRequest`] to the Song Service, so both sides
//! must agree on these shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive song fields derived from an audio blob
///
/// Missing fields deserialize as empty strings so field validation can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongMetadata {
    pub name: String,
    pub artist: String,
    pub album: String,
    /// "mm:ss"
    pub duration: String,
    /// "YYYY"
    pub year: String,
}

/// POST /songs request
///
/// `id` is always supplied by the Resource Service and equals the resource id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSongRequest {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub metadata: SongMetadata,
}

impl CreateSongRequest {
    pub fn new(id: i64, metadata: SongMetadata) -> Self {
        Self {
            id: Some(id),
            metadata,
        }
    }
}

/// GET /songs/{id} response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongResponse {
    pub id: i64,
    #[serde(flatten)]
    pub metadata: SongMetadata,
}

/// Response to a successful create on either service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Response to a batch delete on either service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub ids: Vec<i64>,
}

/// Batch delete query string (`?id=1,2,3`)
#[derive(Debug, Clone, Deserialize)]
pub struct IdBatchQuery {
    pub id: String,
}

/// Error body returned by both services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_message: String,
    /// HTTP status code as a string
    pub error_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    pub fn new(error_message: impl Into<String>, status: u16) -> Self {
        Self {
            error_message: error_message.into(),
            error_code: status.to_string(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: BTreeMap<String, String>) -> Self {
        self.details = Some(details);
        self
    }
}

/// GET /health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_song_request_is_flat() {
        let request = CreateSongRequest::new(
            3,
            SongMetadata {
                name: "So What".to_string(),
                artist: "Miles Davis".to_string(),
                album: "Kind of Blue".to_string(),
                duration: "09:22".to_string(),
                year: "1959".to_string(),
            },
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 3,
                "name": "So What",
                "artist": "Miles Davis",
                "album": "Kind of Blue",
                "duration": "09:22",
                "year": "1959"
            })
        );
    }

    #[test]
    fn test_error_response_omits_missing_details() {
        let value = serde_json::to_value(ErrorResponse::new("Not found", 404)).unwrap();
        assert_eq!(value, json!({"errorMessage": "Not found", "errorCode": "404"}));
    }
}

//! Request validation rules shared by the Resource Service and the Song Service
//!
//! Identifier rules:
//! - An id is a positive 64-bit integer
//! - A batch is a comma-separated id list shorter than [`MAX_BATCH_LEN`] characters
//!   with no blank tokens
//!
//! Duplicate ids in a batch are legal; callers process each occurrence independently.
//!
//! Song field rules mirror the song metadata schema (text columns are limited to
//! [`MAX_TEXT_FIELD_LEN`] characters, duration is "mm:ss", year is "YYYY").

use std::collections::BTreeMap;
use thiserror::Error;

use crate::api::SongMetadata;

/// Exclusive upper bound on the raw batch length in characters
pub const MAX_BATCH_LEN: usize = 200;

/// Maximum length of name/artist/album
pub const MAX_TEXT_FIELD_LEN: usize = 100;

/// Earliest accepted release year
pub const MIN_YEAR: u32 = 1900;

/// Latest accepted release year
pub const MAX_YEAR: u32 = 2099;

/// Identifier and batch validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Token is not parseable as an integer
    #[error("Invalid ID format: '{0}'. Only positive integers are allowed")]
    MalformedId(String),

    /// Token parsed but is zero or negative
    #[error("Invalid value '{0}' for ID. Must be a positive integer")]
    NonPositiveId(i64),

    /// Raw batch string has [`MAX_BATCH_LEN`] or more characters
    #[error("CSV string is too long: received {0} characters, maximum allowed is {MAX_BATCH_LEN}")]
    BatchTooLong(usize),

    /// A token in the batch is blank after trimming
    #[error("Empty ID in CSV string")]
    EmptyToken,
}

/// Validate a single raw identifier
///
/// Surrounding whitespace is ignored. Returns the parsed id when it is a positive integer.
pub fn validate_id(raw: &str) -> Result<i64, ValidationError> {
    let trimmed = raw.trim();
    let id: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::MalformedId(trimmed.to_string()))?;

    if id <= 0 {
        return Err(ValidationError::NonPositiveId(id));
    }

    Ok(id)
}

/// Validate the shape of a comma-separated id batch
///
/// Returns the trimmed tokens in input order. Tokens are not parsed here; see
/// [`parse_batch`] for the full check.
pub fn validate_batch(csv: &str) -> Result<Vec<&str>, ValidationError> {
    let len = csv.chars().count();
    if len >= MAX_BATCH_LEN {
        return Err(ValidationError::BatchTooLong(len));
    }

    csv.split(',')
        .map(str::trim)
        .map(|token| {
            if token.is_empty() {
                Err(ValidationError::EmptyToken)
            } else {
                Ok(token)
            }
        })
        .collect()
}

/// Validate a batch and parse every token into a positive id
///
/// All-or-nothing: a single bad token fails the whole batch, so callers never act on
/// a partially parsed batch.
pub fn parse_batch(csv: &str) -> Result<Vec<i64>, ValidationError> {
    validate_batch(csv)?
        .into_iter()
        .map(validate_id)
        .collect()
}

/// Join ids back into the comma-separated wire encoding
pub fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Check song metadata fields
///
/// Returns a field name → message map; an empty map means the fields are valid.
pub fn validate_song_fields(metadata: &SongMetadata) -> BTreeMap<String, String> {
    let mut details = BTreeMap::new();

    for (field, label, value) in [
        ("name", "Name", &metadata.name),
        ("artist", "Artist", &metadata.artist),
        ("album", "Album", &metadata.album),
    ] {
        if let Some(message) = check_text_field(label, value) {
            details.insert(field.to_string(), message);
        }
    }

    if metadata.duration.trim().is_empty() {
        details.insert("duration".to_string(), "Duration is required".to_string());
    } else if !is_mm_ss(&metadata.duration) {
        details.insert(
            "duration".to_string(),
            "Duration must be in mm:ss format with leading zeros".to_string(),
        );
    }

    if metadata.year.trim().is_empty() {
        details.insert("year".to_string(), "Year is required".to_string());
    } else if !is_yyyy(&metadata.year) {
        details.insert("year".to_string(), "Year must be in YYYY format".to_string());
    } else if !year_in_range(&metadata.year) {
        details.insert(
            "year".to_string(),
            format!("Year must be between {} and {}", MIN_YEAR, MAX_YEAR),
        );
    }

    details
}

fn check_text_field(label: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{} is required", label));
    }
    if value.chars().count() > MAX_TEXT_FIELD_LEN {
        return Some(format!(
            "{} must be between 1 and {} characters",
            label, MAX_TEXT_FIELD_LEN
        ));
    }
    None
}

/// `dd:dd`
fn is_mm_ss(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 5
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[2] == b':'
        && bytes[3..].iter().all(u8::is_ascii_digit)
}

/// `dddd`
fn is_yyyy(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}

fn year_in_range(value: &str) -> bool {
    value
        .parse::<u32>()
        .map(|year| (MIN_YEAR..=MAX_YEAR).contains(&year))
        .unwrap_or(false)
}

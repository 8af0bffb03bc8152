//! Audio inspection service
//!
//! Decides whether an uploaded blob is MP3 audio and derives song metadata from its tags.
//!
//! Derived fields:
//! - name ← title tag
//! - artist, album ← matching tags
//! - year ← year tag
//! - duration ← audio properties, "mm:ss"
//!
//! Extraction never fails. Missing, blank or unusable values fall back to defaults, and
//! text is truncated, so the result always passes Song Service field validation.

use lofty::prelude::*;
use lofty::probe::Probe;
use mplat_common::api::SongMetadata;
use mplat_common::time::format_mm_ss;
use mplat_common::validation::{MAX_TEXT_FIELD_LEN, MAX_YEAR, MIN_YEAR};
use std::io::Cursor;
use thiserror::Error;

const AUDIO_MPEG_MEDIA_TYPE: &str = "audio/mpeg";

const DEFAULT_TITLE: &str = "Unknown Title";
const DEFAULT_ARTIST: &str = "Unknown Artist";
const DEFAULT_ALBUM: &str = "Unknown Album";
const DEFAULT_YEAR: u32 = MIN_YEAR;
const DEFAULT_DURATION: &str = "00:00";

/// Longest duration representable as two-digit "mm:ss"
const MAX_DURATION_SECS: u64 = 99 * 60 + 59;

/// Payload rejected before anything is persisted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAudio {
    #[error("MP3 data is empty")]
    Empty,

    #[error("Invalid MP3 data. Expected audio/mpeg media type")]
    NotMpeg,
}

/// Format check and metadata derivation for uploaded blobs
pub trait AudioInspector: Send + Sync {
    /// Reject blobs that are not acceptable audio
    fn validate(&self, audio_data: &[u8]) -> Result<(), InvalidAudio>;

    /// Derive song metadata from a validated blob
    fn extract_metadata(&self, audio_data: &[u8]) -> SongMetadata;

    /// Metadata to register when extraction could not run at all
    fn fallback_metadata(&self) -> SongMetadata;
}

/// MP3 inspector backed by `infer` (sniffing) and `lofty` (tags)
#[derive(Debug, Default, Clone, Copy)]
pub struct Mp3Inspector;

impl Mp3Inspector {
    pub fn new() -> Self {
        Self
    }

    /// Default metadata used when tags cannot be read at all
    pub fn default_metadata() -> SongMetadata {
        SongMetadata {
            name: DEFAULT_TITLE.to_string(),
            artist: DEFAULT_ARTIST.to_string(),
            album: DEFAULT_ALBUM.to_string(),
            duration: DEFAULT_DURATION.to_string(),
            year: DEFAULT_YEAR.to_string(),
        }
    }
}

impl AudioInspector for Mp3Inspector {
    fn validate(&self, audio_data: &[u8]) -> Result<(), InvalidAudio> {
        if audio_data.is_empty() {
            return Err(InvalidAudio::Empty);
        }

        let media_type = infer::get(audio_data).map(|kind| kind.mime_type());
        if !media_type.is_some_and(|mime| mime.eq_ignore_ascii_case(AUDIO_MPEG_MEDIA_TYPE)) {
            tracing::debug!(detected = ?media_type, "Rejected upload media type");
            return Err(InvalidAudio::NotMpeg);
        }

        Ok(())
    }

    fn extract_metadata(&self, audio_data: &[u8]) -> SongMetadata {
        let tagged_file = match Probe::new(Cursor::new(audio_data))
            .guess_file_type()
            .map_err(|e| e.to_string())
            .and_then(|probe| probe.read().map_err(|e| e.to_string()))
        {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(error = %e, "Error extracting MP3 metadata - using defaults");
                return Self::default_metadata();
            }
        };

        let duration = format_duration(tagged_file.properties().duration().as_secs());

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag());

        let (title, artist, album, year) = match tag {
            Some(tag) => (
                tag.title().map(|s| s.to_string()),
                tag.artist().map(|s| s.to_string()),
                tag.album().map(|s| s.to_string()),
                tag.year(),
            ),
            None => (None, None, None, None),
        };

        let metadata = SongMetadata {
            name: text_or_default(title, DEFAULT_TITLE),
            artist: text_or_default(artist, DEFAULT_ARTIST),
            album: text_or_default(album, DEFAULT_ALBUM),
            duration,
            year: year_or_default(year),
        };

        tracing::debug!(
            name = %metadata.name,
            artist = %metadata.artist,
            album = %metadata.album,
            duration = %metadata.duration,
            year = %metadata.year,
            "Extracted MP3 metadata"
        );

        metadata
    }

    fn fallback_metadata(&self) -> SongMetadata {
        Self::default_metadata()
    }
}

fn year_or_default(year: Option<u32>) -> String {
    year.filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
        .unwrap_or(DEFAULT_YEAR)
        .to_string()
}

/// "mm:ss" clamped to the two-digit range; zero means the length is unknown
fn format_duration(total_secs: u64) -> String {
    if total_secs == 0 {
        DEFAULT_DURATION.to_string()
    } else {
        format_mm_ss(total_secs.min(MAX_DURATION_SECS))
    }
}

fn text_or_default(value: Option<String>, default: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.chars().take(MAX_TEXT_FIELD_LEN).collect(),
        _ => default.to_string(),
    }
}

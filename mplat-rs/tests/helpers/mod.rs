//! Shared test helpers for mplat-rs integration tests
//!
//! - MP3 fixtures built in memory
//! - In-process Song Service stand-in with failure injection
//! - Resource store wrapper with failure injection

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use mplat_common::api::SongMetadata;
use mplat_common::validation::parse_batch;
use mplat_rs::db::{init_in_memory_pool, SqliteResourceStore};
use mplat_rs::services::{
    AudioInspector, InvalidAudio, MetadataGateway, Mp3Inspector, RemoteFailure, ResourceStore,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

// =============================================================================
// MP3 fixtures
// =============================================================================

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, joint stereo, no padding
const MPEG_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];
const MPEG_FRAME_LEN: usize = 417;

/// Raw MPEG frames with no tag
pub fn untagged_mp3() -> Vec<u8> {
    mpeg_frames(40)
}

/// MPEG frames preceded by an ID3v2.3 tag with title, artist and album
pub fn tagged_mp3(title: &str, artist: &str, album: &str) -> Vec<u8> {
    id3v23_mp3(&[("TIT2", title), ("TPE1", artist), ("TALB", album)])
}

/// Like [`tagged_mp3`], with a TYER (year) frame as well
pub fn tagged_mp3_with_year(title: &str, artist: &str, album: &str, year: &str) -> Vec<u8> {
    id3v23_mp3(&[
        ("TIT2", title),
        ("TPE1", artist),
        ("TALB", album),
        ("TYER", year),
    ])
}

fn id3v23_mp3(text_frames: &[(&str, &str)]) -> Vec<u8> {
    let mut frames = Vec::new();
    for (frame_id, text) in text_frames {
        let mut content = vec![0x00]; // ISO-8859-1
        content.extend_from_slice(text.as_bytes());

        frames.extend_from_slice(frame_id.as_bytes());
        frames.extend_from_slice(&(content.len() as u32).to_be_bytes());
        frames.extend_from_slice(&[0, 0]);
        frames.extend_from_slice(&content);
    }

    let mut data = b"ID3".to_vec();
    data.extend_from_slice(&[3, 0, 0]);
    data.extend_from_slice(&syncsafe(frames.len() as u32));
    data.extend_from_slice(&frames);
    data.extend_from_slice(&mpeg_frames(40));
    data
}

fn mpeg_frames(count: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(count * MPEG_FRAME_LEN);
    for _ in 0..count {
        data.extend_from_slice(&MPEG_FRAME_HEADER);
        data.extend(std::iter::repeat(0u8).take(MPEG_FRAME_LEN - MPEG_FRAME_HEADER.len()));
    }
    data
}

fn syncsafe(n: u32) -> [u8; 4] {
    [
        ((n >> 21) & 0x7F) as u8,
        ((n >> 14) & 0x7F) as u8,
        ((n >> 7) & 0x7F) as u8,
        (n & 0x7F) as u8,
    ]
}

// =============================================================================
// Song Service stand-in
// =============================================================================

/// Remote failure to inject on create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    Rejected,
    Timeout,
    Unreachable,
    /// Record is stored, then the response is lost
    TimeoutAfterCommit,
}

impl InjectedFailure {
    pub const ALL: [InjectedFailure; 4] = [
        InjectedFailure::Rejected,
        InjectedFailure::Timeout,
        InjectedFailure::Unreachable,
        InjectedFailure::TimeoutAfterCommit,
    ];

    fn to_remote_failure(self, id: i64) -> RemoteFailure {
        match self {
            InjectedFailure::Rejected => RemoteFailure::Rejected {
                id,
                status: 503,
                body: String::new(),
            },
            InjectedFailure::Timeout | InjectedFailure::TimeoutAfterCommit => {
                RemoteFailure::Timeout(5000)
            }
            InjectedFailure::Unreachable => {
                RemoteFailure::Unreachable("connection refused".to_string())
            }
        }
    }
}

/// In-memory metadata store behaving like the Song Service
#[derive(Default)]
pub struct RecordingGateway {
    records: Mutex<BTreeMap<i64, SongMetadata>>,
    delete_batches: Mutex<Vec<String>>,
    create_calls: AtomicI64,
    failure: Mutex<Option<InjectedFailure>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failure: InjectedFailure) -> Self {
        let gateway = Self::default();
        gateway.set_failure(Some(failure));
        gateway
    }

    pub fn set_failure(&self, failure: Option<InjectedFailure>) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn record_ids(&self) -> Vec<i64> {
        self.records.lock().unwrap().keys().copied().collect()
    }

    pub fn record(&self, id: i64) -> Option<SongMetadata> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn insert_record(&self, id: i64) {
        self.records.lock().unwrap().insert(id, SongMetadata::default());
    }

    pub fn delete_batches(&self) -> Vec<String> {
        self.delete_batches.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> i64 {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataGateway for RecordingGateway {
    async fn create_metadata(&self, id: i64, metadata: &SongMetadata) -> Result<(), RemoteFailure> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let failure = *self.failure.lock().unwrap();
        if let Some(failure) = failure {
            if failure != InjectedFailure::TimeoutAfterCommit {
                return Err(failure.to_remote_failure(id));
            }
        }

        let mut records = self.records.lock().unwrap();
        if records.contains_key(&id) {
            return Err(RemoteFailure::Rejected {
                id,
                status: 409,
                body: String::new(),
            });
        }
        records.insert(id, metadata.clone());

        match failure {
            Some(failure) => Err(failure.to_remote_failure(id)),
            None => Ok(()),
        }
    }

    async fn delete_metadata_batch(&self, csv_ids: &str) {
        self.delete_batches.lock().unwrap().push(csv_ids.to_string());

        if let Ok(ids) = parse_batch(csv_ids) {
            let mut records = self.records.lock().unwrap();
            for id in ids {
                records.remove(&id);
            }
        }
    }
}

// =============================================================================
// Inspector whose tag parser panics
// =============================================================================

/// Validates like [`Mp3Inspector`] but panics while extracting tags
pub struct PanickingInspector;

impl AudioInspector for PanickingInspector {
    fn validate(&self, audio_data: &[u8]) -> Result<(), InvalidAudio> {
        Mp3Inspector::new().validate(audio_data)
    }

    fn extract_metadata(&self, _audio_data: &[u8]) -> SongMetadata {
        panic!("tag parser failure");
    }

    fn fallback_metadata(&self) -> SongMetadata {
        Mp3Inspector::default_metadata()
    }
}

// =============================================================================
// Resource store with failure injection
// =============================================================================

/// SQLite store whose deletes can be made to fail
pub struct FlakyStore {
    inner: SqliteResourceStore,
    fail_all_deletes: AtomicBool,
    /// Fail deletes of this id only (0 = none)
    fail_delete_id: AtomicI64,
}

impl FlakyStore {
    pub fn new(inner: SqliteResourceStore) -> Self {
        Self {
            inner,
            fail_all_deletes: AtomicBool::new(false),
            fail_delete_id: AtomicI64::new(0),
        }
    }

    pub fn fail_all_deletes(&self) {
        self.fail_all_deletes.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete_of(&self, id: i64) {
        self.fail_delete_id.store(id, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &SqliteResourceStore {
        &self.inner
    }
}

#[async_trait]
impl ResourceStore for FlakyStore {
    async fn save(&self, audio_data: &[u8]) -> Result<i64> {
        self.inner.save(audio_data).await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        self.inner.exists_by_id(id).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        if self.fail_all_deletes.load(Ordering::SeqCst)
            || self.fail_delete_id.load(Ordering::SeqCst) == id
        {
            anyhow::bail!("database is locked");
        }
        self.inner.delete_by_id(id).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Vec<u8>>> {
        self.inner.find_by_id(id).await
    }
}

// =============================================================================
// Database helpers
// =============================================================================

/// Fresh in-memory resource store
pub async fn sqlite_store() -> SqliteResourceStore {
    SqliteResourceStore::new(
        init_in_memory_pool()
            .await
            .expect("Should create in-memory database"),
    )
}

/// Insert a resource with a chosen id
pub async fn insert_resource_with_id(store: &SqliteResourceStore, id: i64) {
    let audio = untagged_mp3();
    sqlx::query("INSERT INTO resources (id, audio_data, file_size) VALUES (?, ?, ?)")
        .bind(id)
        .bind(&audio)
        .bind(audio.len() as i64)
        .execute(store.pool())
        .await
        .expect("Should insert resource");
}

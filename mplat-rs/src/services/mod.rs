//! Resource Service business logic
//!
//! - [`creation_coordinator`]: persist a resource, register its metadata remotely,
//!   undo the local persist when registration fails
//! - [`batch_delete_coordinator`]: delete a comma-separated id batch locally, then ask
//!   the Song Service to delete the same batch
//! - [`song_gateway`]: the Song Service as seen from this side
//! - [`resource_store`]: local resource persistence
//! - [`audio_inspector`]: MP3 sniffing and tag extraction

pub mod audio_inspector;
pub mod batch_delete_coordinator;
pub mod creation_coordinator;
pub mod resource_store;
pub mod song_gateway;

pub use audio_inspector::{AudioInspector, InvalidAudio, Mp3Inspector};
pub use batch_delete_coordinator::{BatchDeleteCoordinator, BatchDeleteOutcome};
pub use creation_coordinator::{CreationCoordinator, CreationStage};
pub use resource_store::ResourceStore;
pub use song_gateway::{HttpSongGateway, MetadataGateway, RemoteFailure};

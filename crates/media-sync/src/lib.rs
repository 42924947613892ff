//! # Media Sync - local media intent for conference clients
//!
//! Keeps the application's record of what the local microphone and camera
//! *should* be doing consistent with the tracks that actually exist:
//!
//! - when the user leaves a conference, mute and camera intent return to
//!   their session-start defaults;
//! - when a local track appears, its mute flag is made to match the recorded
//!   intent and the track layer is told to follow.
//!
//! ## Architecture
//!
//! - [`media`] - the intent document and the changes that mutate it
//! - [`store`] - owner of the document, publishes applied changes
//! - [`pipeline`] - synchronous notification bus with observers
//! - [`sync`] - the synchronizer observer
//! - [`track`] - track descriptors and the track-layer trait
//! - [`config`] - configuration and logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use confsync_media_sync::{
//!     build_pipeline, setup_logging, MediaSyncConfig, Notification, TrackHandle, TrackRegistry,
//!     TrackResult,
//! };
//!
//! struct Devices;
//!
//! impl TrackRegistry for Devices {
//!     fn set_track_muted(&self, _handle: &TrackHandle, _muted: bool) -> TrackResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! let config = MediaSyncConfig::from_toml_str("[logging]\nlevel = \"debug\"").unwrap();
//!
//! // Logging is global and owned by the application
//! setup_logging(&config.logging).ok();
//!
//! let pipeline = build_pipeline(config.event_capacity, Arc::new(Devices));
//! pipeline.dispatch(&mut Notification::SessionLeft).unwrap();
//! assert!(pipeline.store().read().is_default());
//! ```

pub mod config;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod store;
pub mod sync;
pub mod track;

use std::sync::Arc;

pub use config::{setup_logging, LoggingConfig, MediaSyncConfig};
pub use error::{ConfigError, ConfigResult, TrackError, TrackResult};
pub use media::{FacingMode, MediaState, MediaType, StateChange};
pub use pipeline::{Notification, NotificationObserver, ObserverId, Pipeline};
pub use store::{MediaStore, StateChanged, StateStream};
pub use sync::{MediaStateSynchronizer, MuteCommand};
pub use track::{Track, TrackHandle, TrackRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create a store and pipeline with the synchronizer already installed
///
/// `event_capacity` is the per-subscriber buffer of the store, usually
/// [`MediaSyncConfig::event_capacity`]. Installing a tracing subscriber is
/// left to the application, see [`setup_logging`].
///
/// This should be called once at application startup.
pub fn build_pipeline(event_capacity: usize, registry: Arc<dyn TrackRegistry>) -> Pipeline {
    let store = MediaStore::with_capacity(MediaState::default(), event_capacity);
    let pipeline = Pipeline::new(Arc::new(store));
    MediaStateSynchronizer::install(&pipeline, registry);

    tracing::info!("media sync v{} initialized", VERSION);
    pipeline
}

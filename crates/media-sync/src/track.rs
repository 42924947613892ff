//! Media tracks and the registry that owns them
//!
//! A [`Track`] is created by the track layer and announced once through a
//! `TrackAdded` notification. The registry behind [`TrackRegistry`] is the
//! only thing that can push a mute state down to the device.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TrackResult;
use crate::media::MediaType;

/// Opaque reference to a track inside the track layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackHandle(Uuid);

impl TrackHandle {
    /// Allocate a fresh handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A local or remote media track as announced by the track layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    media_type: MediaType,
    local: bool,
    muted: bool,
    handle: TrackHandle,
}

impl Track {
    /// Create a track descriptor
    pub fn new(media_type: MediaType, local: bool, muted: bool, handle: TrackHandle) -> Self {
        Self {
            media_type,
            local,
            muted,
            handle,
        }
    }

    /// Local track with a fresh handle
    pub fn local(media_type: MediaType, muted: bool) -> Self {
        Self::new(media_type, true, muted, TrackHandle::new())
    }

    /// Remote track with a fresh handle
    pub fn remote(media_type: MediaType, muted: bool) -> Self {
        Self::new(media_type, false, muted, TrackHandle::new())
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn is_local(&self) -> bool {
        self.local
    }

    /// The track's own mute flag. May be stale at announcement time.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn handle(&self) -> TrackHandle {
        self.handle
    }

    /// Overwrite the in-memory mute flag without touching the device
    ///
    /// Callers pair this with [`TrackRegistry::set_track_muted`] so the flag and
    /// the device never observably diverge.
    pub fn set_muted_locally(&mut self, muted: bool) {
        self.muted = muted;
    }
}

/// Track-layer capability used to push mute state down to a device
pub trait TrackRegistry: Send + Sync {
    /// Mute or unmute the track behind `handle`
    fn set_track_muted(&self, handle: &TrackHandle, muted: bool) -> TrackResult<()>;
}

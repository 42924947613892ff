//! Media state synchronizer
//!
//! Keeps the recorded media intent and the live local tracks consistent
//! across two lifecycle notifications:
//!
//! - **Session left** - restores the session-start defaults (unmuted audio,
//!   unmuted video, user-facing camera). Only fields that differ from their
//!   default produce a change, so nothing downstream re-creates a track or
//!   unmutes a device that is already in the right state.
//! - **Local track added** - a track can be created muted or unmuted before
//!   the intent recorded in the store reaches it. The store wins: the track's
//!   flag is corrected and the device is told to follow.
//!
//! Both decisions are pure functions over a state snapshot ([`reset_changes`]
//! and [`plan_reconciliation`]); [`MediaStateSynchronizer`] is the observer
//! that wires them into a [`Pipeline`].
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use confsync_media_sync::error::TrackResult;
//! use confsync_media_sync::media::{MediaState, MediaType, StateChange};
//! use confsync_media_sync::pipeline::{Notification, Pipeline};
//! use confsync_media_sync::store::MediaStore;
//! use confsync_media_sync::sync::MediaStateSynchronizer;
//! use confsync_media_sync::track::{Track, TrackHandle, TrackRegistry};
//!
//! struct NoopRegistry;
//!
//! impl TrackRegistry for NoopRegistry {
//!     fn set_track_muted(&self, _handle: &TrackHandle, _muted: bool) -> TrackResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! let store = Arc::new(MediaStore::new());
//! let pipeline = Pipeline::new(store.clone());
//! MediaStateSynchronizer::install(&pipeline, Arc::new(NoopRegistry));
//!
//! // Audio intent is unmuted, but the new track came up muted
//! let mut notification = Notification::TrackAdded {
//!     track: Track::local(MediaType::Audio, true),
//! };
//! pipeline.dispatch(&mut notification).unwrap();
//! if let Notification::TrackAdded { track } = &notification {
//!     assert!(!track.is_muted());
//! }
//!
//! let mut mute_video = Notification::StateChanged(StateChange::SetVideoMuted(true));
//! pipeline.dispatch(&mut mute_video).unwrap();
//! pipeline.dispatch(&mut Notification::SessionLeft).unwrap();
//! assert_eq!(store.read(), MediaState::default());
//! ```

use std::sync::Arc;

use crate::error::TrackResult;
use crate::media::{FacingMode, MediaState, StateChange};
use crate::pipeline::{Notification, NotificationObserver, ObserverId, Pipeline};
use crate::track::{Track, TrackHandle, TrackRegistry};

/// State changes that bring `state` back to the session-start defaults
///
/// One change per field that differs from its default, none otherwise.
pub fn reset_changes(state: &MediaState) -> Vec<StateChange> {
    let mut changes = Vec::new();

    if state.audio.muted {
        changes.push(StateChange::SetAudioMuted(false));
    }

    // Switching cameras re-creates the local video track
    if state.video.facing_mode != FacingMode::User {
        changes.push(StateChange::SetFacingMode(FacingMode::User));
    }

    if state.video.muted {
        changes.push(StateChange::SetVideoMuted(false));
    }

    changes
}

/// Mute command for the track layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuteCommand {
    /// Track to command
    pub handle: TrackHandle,
    /// Mute state to apply
    pub muted: bool,
}

/// Decide whether a newly announced track needs its mute state corrected
///
/// Returns `None` for remote tracks and for local tracks that already agree
/// with the recorded intent.
pub fn plan_reconciliation(state: &MediaState, track: &Track) -> Option<MuteCommand> {
    if !track.is_local() {
        return None;
    }

    let intent = state.muted(track.media_type());
    if track.is_muted() == intent {
        return None;
    }

    Some(MuteCommand {
        handle: track.handle(),
        muted: intent,
    })
}

/// Observer resetting media intent on session end and reconciling local tracks
pub struct MediaStateSynchronizer {
    registry: Arc<dyn TrackRegistry>,
}

impl MediaStateSynchronizer {
    /// Synchronizer pushing corrections to `registry`
    pub fn new(registry: Arc<dyn TrackRegistry>) -> Self {
        Self { registry }
    }

    /// Create a synchronizer and register it with `pipeline`
    ///
    /// Meant to be called once while the application boots.
    pub fn install(pipeline: &Pipeline, registry: Arc<dyn TrackRegistry>) -> ObserverId {
        let id = pipeline.register(Arc::new(Self::new(registry)));
        tracing::info!(observer = %id, "media state synchronizer installed");
        id
    }

    /// Session-start defaults to restore for `state`
    pub fn on_session_left(&self, state: &MediaState) -> Vec<StateChange> {
        let changes = reset_changes(state);
        if !changes.is_empty() {
            tracing::info!(
                corrections = changes.len(),
                "session left, restoring default media state"
            );
        }
        changes
    }

    /// Bring a newly announced track in line with the recorded intent
    ///
    /// The in-memory flag is corrected before the device command is sent. If
    /// the command fails the error is returned as is and the flag keeps the
    /// corrected value.
    pub fn on_track_added(&self, state: &MediaState, track: &mut Track) -> TrackResult<()> {
        let Some(command) = plan_reconciliation(state, track) else {
            return Ok(());
        };

        tracing::debug!(
            track = %command.handle,
            media_type = %track.media_type(),
            muted = command.muted,
            "syncing track mute state with media state"
        );

        track.set_muted_locally(command.muted);
        self.registry.set_track_muted(&command.handle, command.muted)
    }
}

impl NotificationObserver for MediaStateSynchronizer {
    fn on_notification(
        &self,
        notification: &mut Notification,
        state: &MediaState,
    ) -> TrackResult<Vec<StateChange>> {
        match notification {
            Notification::SessionLeft => Ok(self.on_session_left(state)),
            Notification::TrackAdded { track } => {
                self.on_track_added(state, track)?;
                Ok(Vec::new())
            }
            Notification::StateChanged(_) => Ok(Vec::new()),
        }
    }
}

//! Media state store
//!
//! Holds the single [`MediaState`] document. Reads hand out snapshots; writes
//! go through [`MediaStore::dispatch`], which runs the reducer and publishes
//! every effective change to subscribers.
//!
//! # Examples
//!
//! ```rust
//! use confsync_media_sync::media::StateChange;
//! use confsync_media_sync::store::MediaStore;
//!
//! let store = MediaStore::new();
//! let state = store.dispatch(StateChange::SetAudioMuted(true));
//! assert!(state.audio.muted);
//! assert_eq!(store.read(), state);
//! ```

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::media::{MediaState, StateChange};

/// Default capacity of the subscriber channel
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Published after a state change modified the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChanged {
    /// The change that was applied
    pub change: StateChange,
    /// Document after the change
    pub state: MediaState,
}

/// Stream of applied state changes
pub type StateStream = BroadcastStream<StateChanged>;

/// Owner of the media intent document
pub struct MediaStore {
    state: RwLock<MediaState>,
    sender: broadcast::Sender<StateChanged>,
}

impl MediaStore {
    /// Store holding the session-start defaults
    pub fn new() -> Self {
        Self::with_state(MediaState::default())
    }

    /// Store holding `state`
    pub fn with_state(state: MediaState) -> Self {
        Self::with_capacity(state, DEFAULT_EVENT_CAPACITY)
    }

    /// Store holding `state` whose subscriber channel buffers `capacity` events
    pub fn with_capacity(state: MediaState, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            state: RwLock::new(state),
            sender,
        }
    }

    /// Snapshot of the current document
    pub fn read(&self) -> MediaState {
        *self.state.read()
    }

    /// Apply `change` and return the resulting document
    pub fn dispatch(&self, change: StateChange) -> MediaState {
        let (changed, state) = {
            let mut guard = self.state.write();
            let changed = guard.apply(&change);
            (changed, *guard)
        };

        if changed {
            tracing::debug!(?change, "media state updated");
            // No receivers is fine
            let _ = self.sender.send(StateChanged { change, state });
        } else {
            tracing::trace!(?change, "media state unchanged");
        }

        state
    }

    /// Subscribe to applied changes
    pub fn subscribe(&self) -> StateStream {
        BroadcastStream::new(self.sender.subscribe())
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MediaStore {
    fn default() -> Self {
        Self::new()
    }
}

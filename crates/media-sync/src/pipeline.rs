//! Notification pipeline
//!
//! Every notification is first applied to the [`MediaStore`], then handed to
//! each registered [`NotificationObserver`] together with the post-apply
//! snapshot. Observers answer with follow-up [`StateChange`]s, which the
//! pipeline feeds back through itself as [`Notification::StateChanged`] until
//! nothing is left to apply.
//!
//! Delivery is synchronous: [`Pipeline::dispatch`] returns only after every
//! observer, including those reacting to follow-ups, has run to completion.
//! The notification stays with the caller, so a track corrected by an
//! observer is visible afterwards whether or not the dispatch failed.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use confsync_media_sync::error::TrackResult;
//! use confsync_media_sync::media::{MediaState, StateChange};
//! use confsync_media_sync::pipeline::{Notification, NotificationObserver, Pipeline};
//! use confsync_media_sync::store::MediaStore;
//!
//! struct MuteOnLeave;
//!
//! impl NotificationObserver for MuteOnLeave {
//!     fn on_notification(
//!         &self,
//!         notification: &mut Notification,
//!         _state: &MediaState,
//!     ) -> TrackResult<Vec<StateChange>> {
//!         match notification {
//!             Notification::SessionLeft => Ok(vec![StateChange::SetAudioMuted(true)]),
//!             _ => Ok(Vec::new()),
//!         }
//!     }
//! }
//!
//! let store = Arc::new(MediaStore::new());
//! let pipeline = Pipeline::new(store.clone());
//! pipeline.register(Arc::new(MuteOnLeave));
//!
//! pipeline.dispatch(&mut Notification::SessionLeft).unwrap();
//! assert!(store.read().audio.muted);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::TrackResult;
use crate::media::{MediaState, StateChange};
use crate::store::MediaStore;
use crate::track::Track;

/// Notifications flowing through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The user's conference session ended
    SessionLeft,
    /// A local or remote track became known
    TrackAdded {
        /// The announced track; observers may correct its mute flag
        track: Track,
    },
    /// A change to the media intent document
    StateChanged(StateChange),
}

impl Notification {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::SessionLeft => "session_left",
            Notification::TrackAdded { .. } => "track_added",
            Notification::StateChanged(_) => "state_changed",
        }
    }
}

/// Identifier returned by [`Pipeline::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reacts to notifications after they have been applied to the store
pub trait NotificationObserver: Send + Sync {
    /// Handle one notification
    ///
    /// `state` is the store snapshot taken after `notification` was applied.
    /// The returned changes are dispatched through the pipeline once every
    /// observer has seen the current notification. An error aborts the
    /// dispatch and is returned to its caller as is.
    fn on_notification(
        &self,
        notification: &mut Notification,
        state: &MediaState,
    ) -> TrackResult<Vec<StateChange>>;
}

/// Synchronous notification bus in front of a [`MediaStore`]
pub struct Pipeline {
    store: Arc<MediaStore>,
    observers: RwLock<Vec<(ObserverId, Arc<dyn NotificationObserver>)>>,
}

impl Pipeline {
    /// Pipeline feeding `store`
    pub fn new(store: Arc<MediaStore>) -> Self {
        Self {
            store,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// The store behind this pipeline
    pub fn store(&self) -> &Arc<MediaStore> {
        &self.store
    }

    /// Add an observer. Observers run in registration order.
    pub fn register(&self, observer: Arc<dyn NotificationObserver>) -> ObserverId {
        let id = ObserverId(Uuid::new_v4());
        self.observers.write().push((id, observer));
        tracing::debug!(observer = %id, "observer registered");
        id
    }

    /// Remove an observer, returning `true` if it was registered
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write();
        if let Some(pos) = observers.iter().position(|(existing, _)| *existing == id) {
            observers.remove(pos);
            true
        } else {
            false
        }
    }

    /// Number of registered observers
    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Apply `notification`, run observers, then drain their follow-ups
    ///
    /// Observers edit `notification` in place. On error the caller still
    /// holds whatever they changed before failing, e.g. a `TrackAdded` track
    /// whose mute flag was already corrected.
    pub fn dispatch(&self, notification: &mut Notification) -> TrackResult<()> {
        let mut pending = VecDeque::new();

        self.process(notification, &mut pending)?;

        while let Some(change) = pending.pop_front() {
            let mut follow_up = Notification::StateChanged(change);
            self.process(&mut follow_up, &mut pending)?;
        }

        Ok(())
    }

    fn process(
        &self,
        notification: &mut Notification,
        pending: &mut VecDeque<StateChange>,
    ) -> TrackResult<()> {
        let state = match notification {
            Notification::StateChanged(change) => self.store.dispatch(*change),
            Notification::SessionLeft | Notification::TrackAdded { .. } => self.store.read(),
        };

        tracing::debug!(kind = notification.kind(), "dispatching notification");

        // Observers may register or unregister while running
        let observers = self.observers.read().clone();
        for (id, observer) in &observers {
            match observer.on_notification(notification, &state) {
                Ok(changes) => pending.extend(changes),
                Err(e) => {
                    tracing::warn!(
                        observer = %id,
                        kind = notification.kind(),
                        "observer failed: {}",
                        e
                    );
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

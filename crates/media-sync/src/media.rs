//! Media state document and the state changes that mutate it
//!
//! [`MediaState`] records the application's *intent* for the local devices:
//! whether audio and video should be muted and which camera the video track
//! should face. It is owned by the [`MediaStore`](crate::store::MediaStore)
//! and only ever changes through a dispatched [`StateChange`].
//!
//! # Examples
//!
//! ```rust
//! use confsync_media_sync::media::{FacingMode, MediaState, StateChange};
//!
//! let mut state = MediaState::default();
//! assert!(state.is_default());
//!
//! assert!(state.apply(&StateChange::SetFacingMode(FacingMode::Environment)));
//! assert!(!state.apply(&StateChange::SetFacingMode(FacingMode::Environment)));
//! assert_eq!(state.video.facing_mode, FacingMode::Environment);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Microphone audio
    Audio,
    /// Camera video
    Video,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Audio => write!(f, "audio"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

/// Which physical camera a video track is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera, facing the user
    #[default]
    User,
    /// Rear camera, facing away from the user
    Environment,
}

/// Recorded audio intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioState {
    /// Whether local audio should be muted
    pub muted: bool,
}

/// Recorded video intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoState {
    /// Whether local video should be muted
    pub muted: bool,
    /// Last requested camera. Only meaningful while a local video track
    /// exists; starts every session as [`FacingMode::User`].
    pub facing_mode: FacingMode,
}

/// Application-level media intent for the local devices
///
/// Fields absent from a serialized document fall back to their defaults, so a
/// partial document reads as "already default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaState {
    /// Audio intent
    pub audio: AudioState,
    /// Video intent
    pub video: VideoState,
}

impl MediaState {
    /// Recorded mute intent for the given media type
    pub fn muted(&self, media_type: MediaType) -> bool {
        match media_type {
            MediaType::Audio => self.audio.muted,
            MediaType::Video => self.video.muted,
        }
    }

    /// Whether every field holds its session-start default
    pub fn is_default(&self) -> bool {
        *self == MediaState::default()
    }

    /// Apply a state change, returning `true` if the document was modified
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match *change {
            StateChange::SetAudioMuted(muted) => replace(&mut self.audio.muted, muted),
            StateChange::SetVideoMuted(muted) => replace(&mut self.video.muted, muted),
            StateChange::SetFacingMode(mode) => replace(&mut self.video.facing_mode, mode),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// A single change to the media intent document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateChange {
    /// Audio mute intent changed
    SetAudioMuted(bool),
    /// Video mute intent changed
    SetVideoMuted(bool),
    /// Camera facing mode changed
    SetFacingMode(FacingMode),
}

impl StateChange {
    /// Mute change for the given media type
    pub fn set_muted(media_type: MediaType, muted: bool) -> Self {
        match media_type {
            MediaType::Audio => StateChange::SetAudioMuted(muted),
            MediaType::Video => StateChange::SetVideoMuted(muted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_unmuted_user_facing() {
        let state = MediaState::default();
        assert!(!state.audio.muted);
        assert!(!state.video.muted);
        assert_eq!(state.video.facing_mode, FacingMode::User);
        assert!(state.is_default());
    }

    #[test]
    fn apply_reports_whether_value_changed() {
        let mut state = MediaState::default();

        assert!(!state.apply(&StateChange::SetAudioMuted(false)));
        assert!(state.apply(&StateChange::SetAudioMuted(true)));
        assert!(state.audio.muted);
        assert!(!state.is_default());

        assert!(state.apply(&StateChange::set_muted(MediaType::Video, true)));
        assert!(state.muted(MediaType::Video));
        assert!(state.muted(MediaType::Audio));
    }

    #[test]
    fn partial_document_reads_as_default() {
        let state: MediaState = serde_json::from_str(r#"{"video":{"muted":true}}"#).unwrap();
        assert!(!state.audio.muted);
        assert!(state.video.muted);
        assert_eq!(state.video.facing_mode, FacingMode::User);

        let empty: MediaState = serde_json::from_str("{}").unwrap();
        assert!(empty.is_default());
    }

    #[test]
    fn facing_mode_uses_lowercase_names() {
        let json = r#"{"video":{"facingMode":"environment"}}"#;
        let state: MediaState = serde_json::from_str(json).unwrap();
        assert_eq!(state.video.facing_mode, FacingMode::Environment);
        assert_eq!(MediaType::Audio.to_string(), "audio");
    }
}

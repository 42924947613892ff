//! Error types for the media sync library

use thiserror::Error;

/// Result type for track-layer operations
pub type TrackResult<T> = Result<T, TrackError>;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by the track layer when a mute command cannot be applied
///
/// This is the registry's vocabulary; the synchronizer hands these back to
/// its caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// The capture device behind the track is gone or busy
    #[error("Device unavailable: {message}")]
    DeviceUnavailable { message: String },

    /// The track was stopped before the command reached it
    #[error("Track has ended")]
    TrackEnded,

    /// The track layer refused the command
    #[error("Mute command rejected: {reason}")]
    Rejected { reason: String },
}

impl TrackError {
    /// Create a device unavailable error
    pub fn device_unavailable(message: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            message: message.into(),
        }
    }

    /// Create a rejected command error
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Log level string is not one of trace/debug/info/warn/error
    #[error("Invalid log level: {level}")]
    InvalidLogLevel { level: String },

    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config document is not valid TOML for this schema
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Global tracing subscriber was already installed
    #[error("Logging already initialized: {message}")]
    LoggingInit { message: String },
}

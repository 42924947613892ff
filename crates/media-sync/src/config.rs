//! Configuration and logging setup
//!
//! The synchronizer itself takes no options. What can be configured is the
//! surrounding plumbing: how logs are emitted and how many state events the
//! store buffers for slow subscribers.
//!
//! ```toml
//! event_capacity = 128
//!
//! [logging]
//! level = "debug"
//! json = true
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, ConfigResult};
use crate::store::DEFAULT_EVENT_CAPACITY;

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level, one of trace/debug/info/warn/error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Include file and line information
    pub file_info: bool,
    /// Log span enter/exit events
    pub log_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_info: false,
            log_spans: false,
        }
    }
}

impl LoggingConfig {
    /// Logging at `level`, everything else default
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// Enable JSON formatting
    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Enable file and line information in logs
    pub fn with_file_info(mut self) -> Self {
        self.file_info = true;
        self
    }

    /// Enable span logging
    pub fn with_spans(mut self) -> Self {
        self.log_spans = true;
        self
    }

    /// Parsed log level
    pub fn level(&self) -> ConfigResult<Level> {
        parse_log_level(&self.level)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSyncConfig {
    /// Logging setup
    pub logging: LoggingConfig,
    /// Buffered state events per store subscriber
    pub event_capacity: usize,
}

impl Default for MediaSyncConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl MediaSyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Reject values that would only fail later
    pub fn validate(&self) -> ConfigResult<()> {
        self.logging.level()?;
        Ok(())
    }
}

/// Install a global tracing subscriber for `config`
pub fn setup_logging(config: &LoggingConfig) -> ConfigResult<()> {
    let level = config.level()?;
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let span_events = if config.log_spans {
        FmtSpan::ACTIVE
    } else {
        FmtSpan::NONE
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_file(config.file_info)
        .with_line_number(config.file_info);

    let result = if config.json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    result.map_err(|e| ConfigError::LoggingInit {
        message: e.to_string(),
    })
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> ConfigResult<Level> {
    Level::from_str(level).map_err(|_| ConfigError::InvalidLogLevel {
        level: level.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = MediaSyncConfig::from_toml_str("").unwrap();
        assert_eq!(config, MediaSyncConfig::default());
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn partial_logging_section_keeps_other_defaults() {
        let config = MediaSyncConfig::from_toml_str(
            r#"
            event_capacity = 8

            [logging]
            level = "debug"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.event_capacity, 8);
        assert_eq!(config.logging.level().unwrap(), Level::DEBUG);
        assert!(config.logging.json);
        assert!(!config.logging.file_info);
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let doc = "[logging]\nlevel = \"loud\"";
        let err = MediaSyncConfig::from_toml_str(doc).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel { ref level } if level == "loud"));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let doc = "event_capacity = \"many\"";
        let err = MediaSyncConfig::from_toml_str(doc).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn config_file_is_read_and_validated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "event_capacity = 32").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"trace\"").unwrap();
        writeln!(file, "log_spans = true").unwrap();

        let config = MediaSyncConfig::from_file(file.path()).unwrap();

        assert_eq!(config.event_capacity, 32);
        assert_eq!(config.logging.level().unwrap(), Level::TRACE);
        assert!(config.logging.log_spans);
        assert!(!config.logging.json);
    }

    #[test]
    fn invalid_config_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"chatty\"").unwrap();

        let err = MediaSyncConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel { .. }));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media-sync.toml");

        let err = MediaSyncConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn builders_compose() {
        let logging = LoggingConfig::new("warn")
            .with_json()
            .with_file_info()
            .with_spans();
        let config = MediaSyncConfig::new()
            .with_event_capacity(16)
            .with_logging(logging);

        assert_eq!(config.event_capacity, 16);
        assert_eq!(config.logging.level().unwrap(), Level::WARN);
        assert!(config.logging.json);
        assert!(config.logging.file_info);
        assert!(config.logging.log_spans);
    }

    #[test]
    fn setup_logging_rejects_unknown_level() {
        let err = setup_logging(&LoggingConfig::new("loud")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel { ref level } if level == "loud"));
    }

    #[test]
    fn setup_logging_installs_subscriber_once() {
        let config = LoggingConfig::new("debug").with_file_info();

        // Another test may already own the global subscriber
        let _ = setup_logging(&config);

        let err = setup_logging(&config).unwrap_err();
        assert!(matches!(err, ConfigError::LoggingInit { .. }));
    }
}

//! Runtime configuration for the task coordinator and HTTP client.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::download::{CONNECT_TIMEOUT_SECS, DEFAULT_CHUNK_SIZE, READ_TIMEOUT_SECS};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "img";

/// Default progress increment in percent.
pub const DEFAULT_PROGRESS_STEP: u8 = 10;

/// Default pause before each progress increment.
pub const DEFAULT_PROGRESS_PAUSE: Duration = Duration::from_millis(100);

/// Default stand-in for an empty title or attribution.
pub const DEFAULT_PLACEHOLDER: &str = "Unknown";

/// Largest accepted chunk size (1 MiB).
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Longest accepted progress pause.
pub const MAX_PROGRESS_PAUSE: Duration = Duration::from_secs(10);

/// Errors for out-of-range configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric setting is outside its accepted range.
    #[error("invalid value for `{field}`: {value}. Expected range: {expected}")]
    OutOfRange {
        /// Setting name.
        field: &'static str,
        /// Rejected value, rendered.
        value: String,
        /// Accepted range, rendered.
        expected: &'static str,
    },

    /// The output directory is empty.
    #[error("invalid value for `output_dir`: must not be empty")]
    EmptyOutputDir,
}

impl ConfigError {
    fn out_of_range(field: &'static str, value: impl ToString, expected: &'static str) -> Self {
        Self::OutOfRange {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

/// Settings for one coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskConfig {
    /// Directory downloaded files are written to; created on demand.
    pub output_dir: PathBuf,
    /// Progress increment in percent (1..=100).
    pub progress_step: u8,
    /// Pause before each progress increment.
    pub progress_pause: Duration,
    /// Bytes written per chunk in the download phase.
    pub chunk_size: usize,
    /// Shown instead of an empty title or attribution.
    pub placeholder: String,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            progress_step: DEFAULT_PROGRESS_STEP,
            progress_pause: DEFAULT_PROGRESS_PAUSE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl TaskConfig {
    /// Validates every setting.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }
        if !(1..=100).contains(&self.progress_step) {
            return Err(ConfigError::out_of_range(
                "progress_step",
                self.progress_step,
                "1..=100",
            ));
        }
        if self.progress_pause > MAX_PROGRESS_PAUSE {
            return Err(ConfigError::out_of_range(
                "progress_pause_ms",
                self.progress_pause.as_millis(),
                "0..=10000",
            ));
        }
        if !(1..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(ConfigError::out_of_range(
                "chunk_size",
                self.chunk_size,
                "1..=1048576",
            ));
        }
        Ok(())
    }

    /// The percent values reported by the progress phase, always ending at 100.
    #[must_use]
    pub fn progress_steps(&self) -> Vec<u8> {
        let step = usize::from(self.progress_step.max(1));
        let mut steps: Vec<u8> = (0..=100u8).step_by(step).collect();
        if steps.last() != Some(&100) {
            steps.push(100);
        }
        steps
    }
}

/// HTTP client timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Connection establishment timeout.
    pub connect: Duration,
    /// Per-read timeout on the response body; `None` waits indefinitely.
    pub read: Option<Duration>,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read: Some(Duration::from_secs(READ_TIMEOUT_SECS)),
        }
    }
}

impl HttpTimeouts {
    /// Builds timeouts from whole seconds; a read timeout of 0 disables it.
    #[must_use]
    pub fn from_secs(connect_secs: u64, read_secs: u64) -> Self {
        Self {
            connect: Duration::from_secs(connect_secs),
            read: (read_secs > 0).then(|| Duration::from_secs(read_secs)),
        }
    }

    /// Validates timeout ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for a connect timeout outside 1..=3600 s
    /// or a read timeout above 3600 s.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let connect = self.connect.as_secs();
        if !(1..=3600).contains(&connect) {
            return Err(ConfigError::out_of_range(
                "connect_timeout_secs",
                connect,
                "1..=3600",
            ));
        }
        if let Some(read) = self.read
            && read.as_secs() > 3600
        {
            return Err(ConfigError::out_of_range(
                "read_timeout_secs",
                read.as_secs(),
                "0..=3600",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TaskConfig::default().validate().is_ok());
        assert!(HttpTimeouts::default().validate().is_ok());
    }

    #[test]
    fn test_default_output_dir_is_img() {
        assert_eq!(TaskConfig::default().output_dir, PathBuf::from("img"));
    }

    #[test]
    fn test_validate_rejects_zero_progress_step() {
        let config = TaskConfig {
            progress_step: 0,
            ..TaskConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("progress_step"), "{err}");
    }

    #[test]
    fn test_validate_rejects_zero_chunk_size() {
        let config = TaskConfig {
            chunk_size: 0,
            ..TaskConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "chunk_size",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_output_dir() {
        let config = TaskConfig {
            output_dir: PathBuf::new(),
            ..TaskConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyOutputDir));
    }

    #[test]
    fn test_validate_rejects_long_pause() {
        let config = TaskConfig {
            progress_pause: Duration::from_secs(11),
            ..TaskConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_progress_steps_default_is_tens() {
        let steps = TaskConfig::default().progress_steps();
        assert_eq!(steps, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn test_progress_steps_always_end_at_100() {
        let config = TaskConfig {
            progress_step: 30,
            ..TaskConfig::default()
        };
        assert_eq!(config.progress_steps(), vec![0, 30, 60, 90, 100]);
    }

    #[test]
    fn test_progress_steps_full_step() {
        let config = TaskConfig {
            progress_step: 100,
            ..TaskConfig::default()
        };
        assert_eq!(config.progress_steps(), vec![0, 100]);
    }

    #[test]
    fn test_http_timeouts_zero_read_disables() {
        let timeouts = HttpTimeouts::from_secs(5, 0);
        assert_eq!(timeouts.read, None);
        assert!(timeouts.validate().is_ok());
    }

    #[test]
    fn test_http_timeouts_rejects_zero_connect() {
        assert!(HttpTimeouts::from_secs(0, 10).validate().is_err());
    }
}

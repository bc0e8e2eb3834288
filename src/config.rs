//! Session configuration for the violation engine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What happens to an entity's dwell state when the tracker drops it for
/// one or more frames and later reports the same id again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReappearPolicy {
    /// Keep the state and continue counting from where it stopped.
    #[default]
    Resume,
    /// Discard the state; the reappearance is treated as a first sighting.
    Restart,
}

/// Per-session parameters. Fixed for the lifetime of one video stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub fps: f64,
    pub stop_time_threshold_secs: f64,
    pub move_threshold_px: f64,
    pub reappear_policy: ReappearPolicy,
    /// Evict entities unseen for more than this many frames. `None` keeps
    /// every entity for the whole session.
    pub max_idle_frames: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            stop_time_threshold_secs: 5.0,
            move_threshold_px: 5.0,
            reappear_policy: ReappearPolicy::Resume,
            max_idle_frames: None,
        }
    }
}

impl SessionConfig {
    /// Set the stream frame rate, typically read from the opened video.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_stop_time(mut self, secs: f64) -> Self {
        self.stop_time_threshold_secs = secs;
        self
    }

    pub fn with_move_threshold(mut self, px: f64) -> Self {
        self.move_threshold_px = px;
        self
    }

    pub fn with_reappear_policy(mut self, policy: ReappearPolicy) -> Self {
        self.reappear_policy = policy;
        self
    }

    pub fn with_max_idle_frames(mut self, frames: Option<u64>) -> Self {
        self.max_idle_frames = frames;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        if !self.stop_time_threshold_secs.is_finite() || self.stop_time_threshold_secs <= 0.0 {
            return Err(ConfigError::InvalidStopTime(self.stop_time_threshold_secs));
        }
        if !self.move_threshold_px.is_finite() || self.move_threshold_px < 0.0 {
            return Err(ConfigError::InvalidMoveThreshold(self.move_threshold_px));
        }
        Ok(())
    }

    /// Number of stationary frames that constitutes a violation.
    ///
    /// Never below 1: a zero threshold would fire on every reset frame.
    pub fn stop_frames(&self) -> u32 {
        let frames = (self.stop_time_threshold_secs * self.fps).round();
        if frames.is_finite() && frames >= 1.0 {
            frames.min(u32::MAX as f64) as u32
        } else {
            1
        }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_frames() {
        let config = SessionConfig::default().with_fps(10.0).with_stop_time(3.0);
        assert_eq!(config.stop_frames(), 30);

        let config = SessionConfig::default().with_fps(29.97).with_stop_time(5.0);
        assert_eq!(config.stop_frames(), 150);

        let config = SessionConfig::default().with_fps(1.0).with_stop_time(0.2);
        assert_eq!(config.stop_frames(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            SessionConfig::default().with_fps(-1.0).validate(),
            Err(ConfigError::InvalidFps(_))
        ));
        assert!(matches!(
            SessionConfig::default().with_fps(f64::NAN).validate(),
            Err(ConfigError::InvalidFps(_))
        ));
        assert!(matches!(
            SessionConfig::default().with_stop_time(0.0).validate(),
            Err(ConfigError::InvalidStopTime(_))
        ));
        assert!(matches!(
            SessionConfig::default().with_move_threshold(-0.5).validate(),
            Err(ConfigError::InvalidMoveThreshold(_))
        ));
        assert!(SessionConfig::default().with_move_threshold(0.0).validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_overrides_defaults() {
        let config = SessionConfig::from_yaml_str(
            "fps: 25\nstop_time_threshold_secs: 3\nreappear_policy: restart\nmax_idle_frames: 30\n",
        )
        .unwrap();
        assert_eq!(config.fps, 25.0);
        assert_eq!(config.stop_frames(), 75);
        assert_eq!(config.move_threshold_px, 5.0);
        assert_eq!(config.reappear_policy, ReappearPolicy::Restart);
        assert_eq!(config.max_idle_frames, Some(30));
    }

    #[test]
    fn test_yaml_invalid_value_is_rejected() {
        assert!(matches!(
            SessionConfig::from_yaml_str("fps: 0\n"),
            Err(ConfigError::InvalidFps(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SessionConfig::load("/nonexistent/dwellzone.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal session configuration problems, raised before any frame is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("fps must be positive and finite, got {0}")]
    InvalidFps(f64),

    #[error("stop time threshold must be positive and finite, got {0}s")]
    InvalidStopTime(f64),

    #[error("move threshold must be non-negative and finite, got {0}px")]
    InvalidMoveThreshold(f64),

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Failures while persisting a violation record.
#[derive(Debug, Error)]
pub enum EvidenceError {
    #[error("evidence I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize evidence record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write evidence image: {0}")]
    Image(#[from] image::ImageError),
}

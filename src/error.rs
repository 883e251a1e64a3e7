use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced to the host.  Input handling never produces one: calls
/// that make no sense in the current state are ignored instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The drawable surface is missing or too small to hold the play field.
    #[error("drawable surface unavailable ({width}x{height})")]
    SurfaceUnavailable { width: f32, height: f32 },

    #[error("surface I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

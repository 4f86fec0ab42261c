//! Error types
//!
//! The running simulation has no recoverable errors; these cover
//! construction-time validation and loading settings from disk.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid configuration caught when a component is built
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Tile frame dimensions must be positive
    #[error("tile dimensions must be positive (got {width}x{height})")]
    TileSize { width: f32, height: f32 },

    /// Display scale factors must be positive and finite
    #[error("{name} must be positive and finite (got {value})")]
    Scale { name: &'static str, value: f32 },

    /// A tile row needs at least one column variant
    #[error("terrain needs at least one column variant")]
    NoColumns,

    /// Viewport dimensions must be positive
    #[error("viewport must be positive (got {width}x{height})")]
    Viewport { width: f32, height: f32 },

    /// Variant declared no parallax layers
    #[error("variant {0} has no background layers")]
    NoBackgroundLayers(&'static str),

    /// Character target height must be positive
    #[error("target height must be positive (got {0})")]
    TargetHeight(f32),

    /// Any other tuning value out of range
    #[error("invalid setting {name}: {reason}")]
    Tuning { name: &'static str, reason: String },
}

/// Errors that can occur when loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("failed to read settings file at {path}: {source}")]
    Read {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse JSON
    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parsed settings did not validate
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}

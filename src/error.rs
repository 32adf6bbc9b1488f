//! Error types
//!
//! Only configuration problems ever reach the caller. Animation failures are
//! absorbed by the orchestrator and a wrong-direction input is a normal
//! game transition, not an error.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or unreadable game configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Combination must have at least one step
    #[error("combination length must be at least 1")]
    ZeroLength,

    /// Every step needs at least one rotation
    #[error("maximum rotation count must be at least 1")]
    ZeroMaxRotations,

    /// Animation engine cannot step at this rate
    #[error("frame rate must be positive, got {0}")]
    InvalidFrameRate(u32),

    /// A duration setting is negative, not finite, or longer than an hour
    #[error("animation setting `{name}` must be between 0 and 3600 seconds, got {value}")]
    InvalidDuration { name: &'static str, value: f32 },

    /// Settings file could not be read
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for [`crate::Settings`]
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A stage that did not finish normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    /// Completion signal did not fire within the stage timeout
    #[error("stage `{stage}` stalled")]
    Stalled { stage: &'static str },

    /// The animation engine reported a failure
    #[error("animation engine failure: {0}")]
    Engine(String),
}

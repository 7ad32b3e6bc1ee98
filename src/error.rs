//! Error types
//!
//! Geometric infeasibility and out-of-range coordinates are handled where
//! they occur and never show up here.

use thiserror::Error;

/// Failures surfaced by a generation entry point
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// A random-driven strategy was built without a random source
    #[error("{method} generation requires a random source")]
    MissingRandomSource { method: &'static str },

    /// Settings that cannot produce a layout
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),

    /// The cancellation token fired before generation finished.
    /// Tiles written before the abort stay in the grid.
    #[error("generation cancelled")]
    Cancelled,
}

/// Failures while loading presets from disk
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize preset: {0}")]
    Serialize(#[from] ron::Error),
}
